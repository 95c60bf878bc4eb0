//! Galois/Counter Mode over any 16-byte-block primitive.
//!
//! Implements the SP 800-38D construction directly against the
//! [`BlockPrimitive`] capability: GHASH in GF(2^128) for authentication,
//! 32-bit-counter CTR for encryption, tag = `E(J0) XOR GHASH(AAD, C)`.
//! Output layout is ciphertext followed by the 16-byte tag.
//!
//! The GF(2^128) multiply is bit-serial. Correctness over speed: this
//! engine's job is mode composition, not a carry-less-multiply backend.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::CipherError;
use crate::primitive::BlockPrimitive;

/// Block size GCM requires of the underlying primitive.
pub(crate) const GCM_BLOCK: usize = 16;

/// Length of the authentication tag appended to the ciphertext.
pub(crate) const TAG_LEN: usize = 16;

/// Multiplies two elements of GF(2^128) under the GCM reduction
/// polynomial `x^128 + x^7 + x^2 + x + 1`, big-endian bit order.
fn gf128_mul(x: &[u8; 16], y: &[u8; 16]) -> [u8; 16] {
    let mut z = [0u8; 16];
    let mut v = *y;
    for i in 0..128 {
        if (x[i / 8] >> (7 - i % 8)) & 1 == 1 {
            for (zb, vb) in z.iter_mut().zip(&v) {
                *zb ^= vb;
            }
        }
        let lsb = v[15] & 1;
        for j in (1..16).rev() {
            v[j] = (v[j] >> 1) | ((v[j - 1] & 1) << 7);
        }
        v[0] >>= 1;
        if lsb == 1 {
            v[0] ^= 0xE1;
        }
    }
    z
}

/// Incremental GHASH accumulator keyed by the hash subkey `H = E(0^128)`.
struct Ghash {
    h: [u8; 16],
    state: [u8; 16],
}

impl Ghash {
    fn new(h: &[u8; 16]) -> Self {
        Ghash {
            h: *h,
            state: [0u8; 16],
        }
    }

    /// Absorbs `data`, zero-padding the final chunk to a full block.
    fn update(&mut self, data: &[u8]) {
        for chunk in data.chunks(16) {
            let mut block = [0u8; 16];
            block[..chunk.len()].copy_from_slice(chunk);
            for (s, b) in self.state.iter_mut().zip(&block) {
                *s ^= b;
            }
            self.state = gf128_mul(&self.state, &self.h);
        }
    }

    /// Absorbs the closing length block `len(A)_64 || len(C)_64` in bits.
    fn finalize(mut self, aad_len: usize, ct_len: usize) -> [u8; 16] {
        let mut lens = [0u8; 16];
        lens[..8].copy_from_slice(&((aad_len as u64) * 8).to_be_bytes());
        lens[8..].copy_from_slice(&((ct_len as u64) * 8).to_be_bytes());
        self.update(&lens);
        self.state
    }
}

/// Derives the initial counter block J0 from the nonce.
///
/// 96-bit nonces take the fast path `nonce || 0^31 || 1`; any other
/// nonzero length goes through GHASH as SP 800-38D specifies.
fn derive_j0(h: &[u8; 16], nonce: &[u8]) -> [u8; 16] {
    if nonce.len() == 12 {
        let mut j0 = [0u8; 16];
        j0[..12].copy_from_slice(nonce);
        j0[15] = 1;
        j0
    } else {
        let mut gh = Ghash::new(h);
        gh.update(nonce);
        gh.finalize(0, nonce.len())
    }
}

/// Increments the rightmost 32 bits of the counter block, wrapping.
fn inc32(block: &mut [u8; 16]) {
    let mut ctr = u32::from_be_bytes([block[12], block[13], block[14], block[15]]);
    ctr = ctr.wrapping_add(1);
    block[12..].copy_from_slice(&ctr.to_be_bytes());
}

/// XORs `data` with the CTR keystream starting at `inc32(j0)`.
fn ctr32_xor<P: BlockPrimitive + ?Sized>(primitive: &P, j0: &[u8; 16], data: &mut [u8]) {
    let mut counter = *j0;
    let mut keystream = Zeroizing::new([0u8; 16]);
    for chunk in data.chunks_mut(16) {
        inc32(&mut counter);
        keystream.copy_from_slice(&counter);
        primitive.encrypt_block(&mut *keystream);
        for (b, k) in chunk.iter_mut().zip(keystream.iter()) {
            *b ^= k;
        }
    }
}

/// Computes the authentication tag for `ciphertext` under `aad`.
fn compute_tag<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    h: &[u8; 16],
    j0: &[u8; 16],
    aad: &[u8],
    ciphertext: &[u8],
) -> Zeroizing<[u8; 16]> {
    let mut gh = Ghash::new(h);
    gh.update(aad);
    gh.update(ciphertext);
    let s = gh.finalize(aad.len(), ciphertext.len());

    let mut tag = Zeroizing::new(*j0);
    primitive.encrypt_block(&mut *tag);
    for (t, sb) in tag.iter_mut().zip(&s) {
        *t ^= sb;
    }
    tag
}

/// Encrypts and authenticates `plaintext`, returning `ciphertext || tag`.
///
/// The caller (configuration validation) has already established that the
/// primitive's block size is 16 and the nonce is non-empty.
pub(crate) fn seal<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Vec<u8> {
    debug_assert_eq!(primitive.block_size(), GCM_BLOCK);
    debug_assert!(!nonce.is_empty());

    let mut h = Zeroizing::new([0u8; 16]);
    primitive.encrypt_block(&mut *h);
    let j0 = derive_j0(&h, nonce);

    let mut out = plaintext.to_vec();
    ctr32_xor(primitive, &j0, &mut out);

    let tag = compute_tag(primitive, &h, &j0, aad, &out);
    out.extend_from_slice(&*tag);
    out
}

/// Verifies the tag on `ciphertext || tag` and decrypts on success.
///
/// # Errors
/// Returns [`CipherError::Integrity`] if the input is shorter than a tag
/// or the tag does not verify. The comparison is constant-time; nothing is
/// decrypted before verification passes.
pub(crate) fn open<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    nonce: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    debug_assert_eq!(primitive.block_size(), GCM_BLOCK);

    if ciphertext.len() < TAG_LEN {
        return Err(CipherError::Integrity);
    }
    let (body, tag) = ciphertext.split_at(ciphertext.len() - TAG_LEN);

    let mut h = Zeroizing::new([0u8; 16]);
    primitive.encrypt_block(&mut *h);
    let j0 = derive_j0(&h, nonce);

    let expected = compute_tag(primitive, &h, &j0, aad, body);
    if !bool::from(expected[..].ct_eq(tag)) {
        return Err(CipherError::Integrity);
    }

    let mut out = body.to_vec();
    ctr32_xor(primitive, &j0, &mut out);
    Ok(out)
}
