//! Cipher Configuration: the immutable aggregate of mode, padding, and
//! mode parameters consumed read-only by every transform.
//!
//! Validation is a deterministic function of the configuration and the
//! primitive's block size, so it can run (cheaply) at the top of every
//! operation: an invalid configuration yields the same typed error from
//! every call, before any byte is transformed (the sticky-error contract).

use crate::error::CipherError;
use crate::gcm;
use crate::mode::BlockMode;
use crate::padding::PaddingScheme;

/// Aggregate of block mode, padding scheme, IV/nonce, and AAD.
///
/// Mode and padding are fixed at construction and never change mid-stream.
/// A fresh IV or nonce must never be reused across two encryptions under
/// the same key; the engine does not (and cannot) enforce this. It is a
/// caller precondition.
///
/// # Examples
///
/// ```
/// use modecrypt::{BlockMode, CipherConfig, PaddingScheme};
///
/// let config = CipherConfig::new(BlockMode::Cbc, PaddingScheme::Pkcs7)
///     .with_iv(b"87654321".to_vec());
/// assert!(config.validate(8).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CipherConfig {
    mode: BlockMode,
    padding: PaddingScheme,
    iv: Vec<u8>,
    nonce: Vec<u8>,
    aad: Vec<u8>,
}

impl CipherConfig {
    /// Creates a configuration with no IV, nonce, or AAD set.
    pub fn new(mode: BlockMode, padding: PaddingScheme) -> Self {
        CipherConfig {
            mode,
            padding,
            iv: Vec::new(),
            nonce: Vec::new(),
            aad: Vec::new(),
        }
    }

    /// Sets the IV for the chained modes (CBC/CTR/CFB/OFB).
    ///
    /// Must be exactly the primitive's block size; checked by
    /// [`validate`](Self::validate), not here.
    #[must_use]
    pub fn with_iv(mut self, iv: Vec<u8>) -> Self {
        self.iv = iv;
        self
    }

    /// Sets the GCM nonce. Typically 12 bytes; any nonzero length is
    /// accepted.
    #[must_use]
    pub fn with_nonce(mut self, nonce: Vec<u8>) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the GCM additional authenticated data (authenticated, never
    /// encrypted). Ignored by every other mode.
    #[must_use]
    pub fn with_aad(mut self, aad: Vec<u8>) -> Self {
        self.aad = aad;
        self
    }

    /// The configured block mode.
    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    /// The configured padding scheme.
    pub fn padding(&self) -> PaddingScheme {
        self.padding
    }

    /// The configured IV (empty if none was set).
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// The configured nonce (empty if none was set).
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// The configured AAD (empty if none was set).
    pub fn aad(&self) -> &[u8] {
        &self.aad
    }

    /// Checks the configuration against a primitive's block size.
    ///
    /// # Errors
    /// - [`CipherError::MissingIv`] — a chained mode with no IV.
    /// - [`CipherError::InvalidIvLength`] — IV present but not exactly
    ///   `block_size` bytes.
    /// - [`CipherError::MissingNonce`] — GCM with no nonce.
    /// - [`CipherError::IncompatiblePrimitive`] — GCM over a primitive
    ///   whose block size is not 16. Permanent for that primitive.
    pub fn validate(&self, block_size: usize) -> Result<(), CipherError> {
        match self.mode {
            BlockMode::Ecb => Ok(()),
            BlockMode::Cbc | BlockMode::Ctr | BlockMode::Cfb | BlockMode::Ofb => {
                if self.iv.is_empty() {
                    return Err(CipherError::MissingIv { mode: self.mode });
                }
                if self.iv.len() != block_size {
                    return Err(CipherError::InvalidIvLength {
                        expected: block_size,
                        actual: self.iv.len(),
                    });
                }
                Ok(())
            }
            BlockMode::Gcm => {
                if block_size != gcm::GCM_BLOCK {
                    return Err(CipherError::IncompatiblePrimitive {
                        mode: self.mode,
                        required: gcm::GCM_BLOCK,
                        actual: block_size,
                    });
                }
                if self.nonce.is_empty() {
                    return Err(CipherError::MissingNonce);
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecb_needs_nothing() {
        let config = CipherConfig::new(BlockMode::Ecb, PaddingScheme::Pkcs7);
        assert!(config.validate(8).is_ok());
    }

    #[test]
    fn chained_modes_require_an_iv() {
        for mode in [BlockMode::Cbc, BlockMode::Ctr, BlockMode::Cfb, BlockMode::Ofb] {
            let config = CipherConfig::new(mode, PaddingScheme::Pkcs7);
            assert!(matches!(
                config.validate(8),
                Err(CipherError::MissingIv { mode: m }) if m == mode
            ));
        }
    }

    #[test]
    fn wrong_iv_length_is_distinct_from_missing() {
        let config = CipherConfig::new(BlockMode::Cbc, PaddingScheme::Pkcs7)
            .with_iv(b"12345".to_vec());
        assert!(matches!(
            config.validate(8),
            Err(CipherError::InvalidIvLength {
                expected: 8,
                actual: 5
            })
        ));
    }

    #[test]
    fn gcm_rejects_small_block_primitives() {
        let config = CipherConfig::new(BlockMode::Gcm, PaddingScheme::None)
            .with_nonce(vec![0u8; 12]);
        assert!(matches!(
            config.validate(8),
            Err(CipherError::IncompatiblePrimitive {
                required: 16,
                actual: 8,
                ..
            })
        ));
        assert!(config.validate(16).is_ok());
    }

    #[test]
    fn gcm_requires_a_nonce() {
        let config = CipherConfig::new(BlockMode::Gcm, PaddingScheme::None);
        assert!(matches!(config.validate(16), Err(CipherError::MissingNonce)));
    }

    #[test]
    fn validation_is_deterministic_and_sticky() {
        let config = CipherConfig::new(BlockMode::Cbc, PaddingScheme::Pkcs7);
        for _ in 0..3 {
            assert!(matches!(
                config.validate(8),
                Err(CipherError::MissingIv { .. })
            ));
        }
    }
}
