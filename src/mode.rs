//! Block-Mode Engine: extends a single-block primitive to variable-length
//! messages.
//!
//! The six modes form a closed set, so they are a plain enum dispatched to
//! pure transform functions: exhaustiveness is checked at compile time and
//! there is no virtual-call indirection. Each function takes the same
//! shape: the data, the primitive, and the mode parameters drawn from the
//! validated configuration.
//!
//! ECB and CBC require block-aligned input; CTR, CFB, and OFB are
//! stream-like and accept any length. GCM delegates to [`crate::gcm`].

use std::fmt;

use zeroize::Zeroizing;

use crate::config::CipherConfig;
use crate::error::CipherError;
use crate::gcm;
use crate::primitive::BlockPrimitive;

/// Chaining algorithm applied across blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    /// Electronic codebook: each block independent. No IV.
    Ecb,
    /// Cipher block chaining: each plaintext block XORed with the previous
    /// ciphertext block (the IV for the first) before encryption.
    Cbc,
    /// Counter mode: keystream from encrypting a big-endian counter seeded
    /// by the IV. Self-inverse, stream-like.
    Ctr,
    /// Cipher feedback: keystream from encrypting the previous ciphertext
    /// block (the IV for the first). Stream-like.
    Cfb,
    /// Output feedback: keystream chain `E(E(...E(IV)))`. Self-inverse,
    /// stream-like.
    Ofb,
    /// Galois/Counter Mode: authenticated encryption with optional AAD.
    /// Requires a 16-byte-block primitive; output carries a 16-byte tag.
    Gcm,
}

impl BlockMode {
    /// Whether this mode takes a block-sized IV.
    pub fn requires_iv(&self) -> bool {
        matches!(
            self,
            BlockMode::Cbc | BlockMode::Ctr | BlockMode::Cfb | BlockMode::Ofb
        )
    }

    /// Whether input of any length is accepted (keystream modes).
    pub fn is_stream_like(&self) -> bool {
        matches!(self, BlockMode::Ctr | BlockMode::Cfb | BlockMode::Ofb)
    }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockMode::Ecb => "ECB",
            BlockMode::Cbc => "CBC",
            BlockMode::Ctr => "CTR",
            BlockMode::Cfb => "CFB",
            BlockMode::Ofb => "OFB",
            BlockMode::Gcm => "GCM",
        };
        f.write_str(name)
    }
}

/// Runs the forward transform for the configured mode.
///
/// `data` has already been padded; the configuration has already been
/// validated. Empty input short-circuits in the facade, so `data` is
/// non-empty here.
pub(crate) fn encrypt<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    config: &CipherConfig,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    match config.mode() {
        BlockMode::Ecb => ecb_transform(primitive, data, Direction::Encrypt),
        BlockMode::Cbc => cbc_encrypt(primitive, config.iv(), data),
        BlockMode::Ctr => ctr_transform(primitive, config.iv(), data),
        BlockMode::Cfb => cfb_encrypt(primitive, config.iv(), data),
        BlockMode::Ofb => ofb_transform(primitive, config.iv(), data),
        BlockMode::Gcm => Ok(gcm::seal(primitive, config.nonce(), config.aad(), data)),
    }
}

/// Runs the inverse transform for the configured mode.
pub(crate) fn decrypt<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    config: &CipherConfig,
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    match config.mode() {
        BlockMode::Ecb => ecb_transform(primitive, data, Direction::Decrypt),
        BlockMode::Cbc => cbc_decrypt(primitive, config.iv(), data),
        BlockMode::Ctr => ctr_transform(primitive, config.iv(), data),
        BlockMode::Cfb => cfb_decrypt(primitive, config.iv(), data),
        BlockMode::Ofb => ofb_transform(primitive, config.iv(), data),
        BlockMode::Gcm => gcm::open(primitive, config.nonce(), config.aad(), data),
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// Rejects input that is not a whole number of blocks.
fn require_aligned(len: usize, block_size: usize) -> Result<(), CipherError> {
    if len % block_size != 0 {
        return Err(CipherError::UnalignedInput { len, block_size });
    }
    Ok(())
}

fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

fn ecb_transform<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    data: &[u8],
    direction: Direction,
) -> Result<Vec<u8>, CipherError> {
    let bs = primitive.block_size();
    require_aligned(data.len(), bs)?;
    let mut out = data.to_vec();
    for block in out.chunks_mut(bs) {
        match direction {
            Direction::Encrypt => primitive.encrypt_block(block),
            Direction::Decrypt => primitive.decrypt_block(block),
        }
    }
    Ok(out)
}

fn cbc_encrypt<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = primitive.block_size();
    require_aligned(data.len(), bs)?;
    let mut out = data.to_vec();
    let mut prev = iv.to_vec();
    for block in out.chunks_mut(bs) {
        xor_in_place(block, &prev);
        primitive.encrypt_block(block);
        prev.copy_from_slice(block);
    }
    Ok(out)
}

fn cbc_decrypt<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = primitive.block_size();
    require_aligned(data.len(), bs)?;
    let mut out = data.to_vec();
    let mut prev = iv.to_vec();
    for (block, ct) in out.chunks_mut(bs).zip(data.chunks(bs)) {
        primitive.decrypt_block(block);
        xor_in_place(block, &prev);
        prev.copy_from_slice(ct);
    }
    Ok(out)
}

/// CTR is self-inverse: the same keystream XOR both ways.
///
/// The IV is the initial counter block, incremented big-endian across the
/// whole block (wrapping) once per block of keystream.
fn ctr_transform<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = primitive.block_size();
    let mut out = data.to_vec();
    let mut counter = Zeroizing::new(iv.to_vec());
    let mut keystream = Zeroizing::new(vec![0u8; bs]);
    for chunk in out.chunks_mut(bs) {
        keystream.copy_from_slice(&counter);
        primitive.encrypt_block(&mut keystream[..]);
        xor_in_place(chunk, &keystream[..chunk.len()]);
        increment_be(&mut counter);
    }
    Ok(out)
}

/// Big-endian increment over the whole counter block, wrapping to zero.
fn increment_be(counter: &mut [u8]) {
    for byte in counter.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

fn cfb_encrypt<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = primitive.block_size();
    let mut out = data.to_vec();
    let mut prev = Zeroizing::new(iv.to_vec());
    let mut keystream = Zeroizing::new(vec![0u8; bs]);
    for chunk in out.chunks_mut(bs) {
        keystream.copy_from_slice(&prev);
        primitive.encrypt_block(&mut keystream[..]);
        xor_in_place(chunk, &keystream[..chunk.len()]);
        // A trailing partial block never feeds another keystream block.
        if chunk.len() == bs {
            prev.copy_from_slice(chunk);
        }
    }
    Ok(out)
}

fn cfb_decrypt<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = primitive.block_size();
    let mut out = data.to_vec();
    let mut prev = Zeroizing::new(iv.to_vec());
    let mut keystream = Zeroizing::new(vec![0u8; bs]);
    for (chunk, ct) in out.chunks_mut(bs).zip(data.chunks(bs)) {
        keystream.copy_from_slice(&prev);
        primitive.encrypt_block(&mut keystream[..]);
        xor_in_place(chunk, &keystream[..chunk.len()]);
        if ct.len() == bs {
            prev.copy_from_slice(ct);
        }
    }
    Ok(out)
}

/// OFB is self-inverse: keystream block `i` is `E(keystream block i-1)`,
/// seeded by `E(IV)`, independent of the data.
fn ofb_transform<P: BlockPrimitive + ?Sized>(
    primitive: &P,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let bs = primitive.block_size();
    let mut out = data.to_vec();
    let mut keystream = Zeroizing::new(iv.to_vec());
    for chunk in out.chunks_mut(bs) {
        primitive.encrypt_block(&mut keystream[..]);
        xor_in_place(chunk, &keystream[..chunk.len()]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{Aes128Primitive, DesPrimitive};
    use hex_literal::hex;

    // SP 800-38A appendix F key and first plaintext block.
    const AES_KEY: [u8; 16] = hex!("2b7e151628aed2a6abf7158809cf4f3c");
    const PT1: [u8; 16] = hex!("6bc1bee22e409f96e93d7e117393172a");

    fn aes() -> Aes128Primitive {
        Aes128Primitive::new(&AES_KEY).unwrap()
    }

    #[test]
    fn cbc_known_answer_first_block() {
        // SP 800-38A F.2.1.
        let iv = hex!("000102030405060708090a0b0c0d0e0f");
        let ct = cbc_encrypt(&aes(), &iv, &PT1).unwrap();
        assert_eq!(ct, hex!("7649abac8119b246cee98e9b12e9197d"));
        assert_eq!(cbc_decrypt(&aes(), &iv, &ct).unwrap(), PT1);
    }

    #[test]
    fn ctr_known_answer_two_blocks() {
        // SP 800-38A F.5.1: verifies both the keystream and the
        // big-endian counter increment.
        let iv = hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
        let pt = hex!(
            "6bc1bee22e409f96e93d7e117393172a"
            "ae2d8a571e03ac9c9eb76fac45af8e51"
        );
        let ct = ctr_transform(&aes(), &iv, &pt).unwrap();
        assert_eq!(
            ct,
            hex!(
                "874d6191b620e3261bef6864990db6ce"
                "9806f66b7970fdff8617187bb9fffdff"
            )
        );
        assert_eq!(ctr_transform(&aes(), &iv, &ct).unwrap(), pt);
    }

    #[test]
    fn ofb_known_answer_first_block() {
        // SP 800-38A F.4.1.
        let iv = hex!("000102030405060708090a0b0c0d0e0f");
        let ct = ofb_transform(&aes(), &iv, &PT1).unwrap();
        assert_eq!(ct, hex!("3b3fd92eb72dad20333449f8e83cfb4a"));
    }

    #[test]
    fn cfb_known_answer_first_block() {
        // SP 800-38A F.3.13 (CFB128).
        let iv = hex!("000102030405060708090a0b0c0d0e0f");
        let ct = cfb_encrypt(&aes(), &iv, &PT1).unwrap();
        assert_eq!(ct, hex!("3b3fd92eb72dad20333449f8e83cfb4a"));
        assert_eq!(cfb_decrypt(&aes(), &iv, &ct).unwrap(), PT1);
    }

    #[test]
    fn ecb_identical_blocks_leak_structure_cbc_does_not() {
        let des = DesPrimitive::new(b"12345678").unwrap();
        let data = b"AAAAAAAAAAAAAAAA"; // two identical 8-byte blocks
        let ecb = ecb_transform(&des, data, Direction::Encrypt).unwrap();
        assert_eq!(ecb[..8], ecb[8..]);
        let cbc = cbc_encrypt(&des, b"87654321", data).unwrap();
        assert_ne!(cbc[..8], cbc[8..]);
    }

    #[test]
    fn aligned_modes_reject_partial_blocks() {
        let des = DesPrimitive::new(b"12345678").unwrap();
        for result in [
            ecb_transform(&des, b"abc", Direction::Encrypt),
            cbc_encrypt(&des, b"87654321", b"abc"),
            cbc_decrypt(&des, b"87654321", b"abcde"),
        ] {
            assert!(matches!(
                result,
                Err(CipherError::UnalignedInput {
                    len: _,
                    block_size: 8
                })
            ));
        }
    }

    #[test]
    fn stream_modes_accept_any_length() {
        let des = DesPrimitive::new(b"12345678").unwrap();
        let iv = b"87654321";
        for len in [1usize, 7, 8, 9, 23] {
            let data: Vec<u8> = (0..len as u8).collect();
            for (enc, dec) in [
                (
                    ctr_transform(&des, iv, &data).unwrap(),
                    BlockMode::Ctr,
                ),
                (cfb_encrypt(&des, iv, &data).unwrap(), BlockMode::Cfb),
                (ofb_transform(&des, iv, &data).unwrap(), BlockMode::Ofb),
            ] {
                assert_eq!(enc.len(), len, "{} changed length", dec);
            }
        }
    }

    #[test]
    fn counter_wraps_within_the_block() {
        let mut counter = vec![0xFFu8; 8];
        increment_be(&mut counter);
        assert_eq!(counter, vec![0u8; 8]);

        let mut counter = vec![0x00, 0xFF];
        increment_be(&mut counter);
        assert_eq!(counter, vec![0x01, 0x00]);
    }

    #[test]
    fn mode_names_render_uppercase() {
        assert_eq!(BlockMode::Ecb.to_string(), "ECB");
        assert_eq!(BlockMode::Gcm.to_string(), "GCM");
    }
}
