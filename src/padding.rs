//! Padding Codec: reversible transformations making arbitrary-length data
//! block-aligned.
//!
//! Pure byte-buffer transforms with no state and no I/O. Every scheme
//! except `None` is mandatory-per-call: input that is already aligned
//! still grows by a full block, so `unpad` always has padding to remove
//! and `unpad(pad(m)) == m` holds for aligned inputs too.
//!
//! ISO 10126 is the one non-deterministic scheme (random fill bytes);
//! its randomness source is injectable via [`PaddingScheme::pad_with_rng`]
//! so tests can assert exact output.

use rand::RngCore;

use crate::error::CipherError;

/// Padding scheme applied before encryption and removed after decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingScheme {
    /// No padding. Input must already be block-aligned for the
    /// block-aligned modes; the engine reports an alignment error if not.
    None,
    /// Append `0x00` bytes until aligned.
    ///
    /// Inherently ambiguous: trailing `0x00` bytes that are genuine
    /// plaintext cannot be told apart from padding, so `unpad` strips
    /// them too. A property of the scheme, not a defect of this codec.
    Zero,
    /// PKCS#5: `n` bytes of value `n`. Historically defined for 8-byte
    /// blocks; treated as identical to [`PaddingScheme::Pkcs7`] here for
    /// any block size.
    Pkcs5,
    /// PKCS#7: `n` bytes of value `n`, `1 <= n <= block_size`.
    Pkcs7,
    /// ANSI X9.23: `n - 1` zero bytes, then one byte of value `n`.
    AnsiX923,
    /// ISO/IEC 9797-1 padding method 2 ("bit padding"): a single `0x80`
    /// byte, then zeros until aligned.
    Iso9797_1,
    /// ISO/IEC 7816-4: alias of [`PaddingScheme::Iso9797_1`], producing
    /// byte-identical output.
    Iso7816_4,
    /// ISO 10126: `n - 1` random bytes, then one byte of value `n`.
    /// Only the final length byte is validated on removal.
    Iso10126,
}

impl PaddingScheme {
    /// Pads `data` to a multiple of `block_size`.
    ///
    /// For [`PaddingScheme::Iso10126`] the fill bytes come from the
    /// thread-local CSPRNG; use [`pad_with_rng`](Self::pad_with_rng) to
    /// supply a deterministic source instead.
    ///
    /// # Parameters
    /// - `data`: Bytes to pad. May be empty or already aligned.
    /// - `block_size`: Target alignment, in bytes. Must be in `1..=255`
    ///   for the schemes that encode the pad length in a single byte.
    ///
    /// # Returns
    /// The padded buffer. Identity for [`PaddingScheme::None`]; for every
    /// other scheme the output grows by `1..=block_size` bytes.
    pub fn pad(&self, data: &[u8], block_size: usize) -> Vec<u8> {
        self.pad_with_rng(data, block_size, &mut rand::rng())
    }

    /// Pads `data` drawing any random fill bytes from `rng`.
    ///
    /// Identical to [`pad`](Self::pad) for every scheme except
    /// [`PaddingScheme::Iso10126`], which is the only consumer of `rng`.
    pub fn pad_with_rng<R: RngCore + ?Sized>(
        &self,
        data: &[u8],
        block_size: usize,
        rng: &mut R,
    ) -> Vec<u8> {
        let n = block_size - data.len() % block_size;
        let mut out = Vec::with_capacity(data.len() + n);
        out.extend_from_slice(data);
        match self {
            PaddingScheme::None => {}
            PaddingScheme::Zero => out.resize(data.len() + n, 0x00),
            PaddingScheme::Pkcs5 | PaddingScheme::Pkcs7 => {
                out.resize(data.len() + n, n as u8);
            }
            PaddingScheme::AnsiX923 => {
                out.resize(data.len() + n - 1, 0x00);
                out.push(n as u8);
            }
            PaddingScheme::Iso9797_1 | PaddingScheme::Iso7816_4 => {
                out.push(0x80);
                out.resize(data.len() + n, 0x00);
            }
            PaddingScheme::Iso10126 => {
                let mut fill = vec![0u8; n - 1];
                rng.fill_bytes(&mut fill);
                out.extend_from_slice(&fill);
                out.push(n as u8);
            }
        }
        out
    }

    /// Removes the padding from `data`, recovering the original bytes.
    ///
    /// # Parameters
    /// - `data`: A buffer previously produced by [`pad`](Self::pad) (or a
    ///   decryption of one).
    /// - `block_size`: The alignment `pad` was called with.
    ///
    /// # Errors
    /// Returns [`CipherError::Integrity`] if the padding bytes do not
    /// validate; corrupt ciphertext, a wrong key, and tampering all land
    /// here. Never panics.
    pub fn unpad(&self, data: &[u8], block_size: usize) -> Result<Vec<u8>, CipherError> {
        match self {
            PaddingScheme::None => Ok(data.to_vec()),
            PaddingScheme::Zero => {
                let end = data
                    .iter()
                    .rposition(|&b| b != 0x00)
                    .map_or(0, |pos| pos + 1);
                Ok(data[..end].to_vec())
            }
            PaddingScheme::Pkcs5 | PaddingScheme::Pkcs7 => {
                let n = Self::trailing_length_byte(data, block_size)?;
                if data[data.len() - n..].iter().any(|&b| b != n as u8) {
                    return Err(CipherError::Integrity);
                }
                Ok(data[..data.len() - n].to_vec())
            }
            PaddingScheme::AnsiX923 => {
                let n = Self::trailing_length_byte(data, block_size)?;
                if data[data.len() - n..data.len() - 1]
                    .iter()
                    .any(|&b| b != 0x00)
                {
                    return Err(CipherError::Integrity);
                }
                Ok(data[..data.len() - n].to_vec())
            }
            PaddingScheme::Iso9797_1 | PaddingScheme::Iso7816_4 => {
                match data.iter().rposition(|&b| b != 0x00) {
                    Some(pos) if data[pos] == 0x80 => Ok(data[..pos].to_vec()),
                    _ => Err(CipherError::Integrity),
                }
            }
            PaddingScheme::Iso10126 => {
                // Fill bytes are random; only the length byte is trusted.
                let n = Self::trailing_length_byte(data, block_size)?;
                Ok(data[..data.len() - n].to_vec())
            }
        }
    }

    /// Reads and validates the final pad-length byte shared by the
    /// PKCS, ANSI X9.23, and ISO 10126 layouts.
    fn trailing_length_byte(data: &[u8], block_size: usize) -> Result<usize, CipherError> {
        let n = match data.last() {
            Some(&b) => b as usize,
            None => return Err(CipherError::Integrity),
        };
        if n == 0 || n > block_size || n > data.len() {
            return Err(CipherError::Integrity);
        }
        Ok(n)
    }
}
