//! Error types for the modecrypt engine.
//!
//! Every failure the engine can produce is a variant of [`CipherError`],
//! a closed set callers can branch on by kind rather than by message text.
//! Configuration errors are deterministic functions of the configuration,
//! so an instance built with a bad configuration re-reports the same error
//! from every subsequent operation without attempting partial work.

use crate::mode::BlockMode;

/// Errors produced by the modecrypt engine.
///
/// Integrity failures are deliberately undifferentiated: a corrupt padding
/// byte, a wrong key, and a failed GCM tag check all surface as
/// [`CipherError::Integrity`] so the error kind cannot be used as a
/// padding oracle.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    /// The selected mode requires an IV and none (or an empty one) was given.
    #[error("{mode} mode requires an IV but none was provided")]
    MissingIv {
        /// The mode that required the IV.
        mode: BlockMode,
    },

    /// An IV was given but its length does not equal the block size.
    #[error("invalid IV length: expected {expected} bytes, got {actual}")]
    InvalidIvLength {
        /// Required IV length (the primitive's block size).
        expected: usize,
        /// Length of the IV actually provided.
        actual: usize,
    },

    /// GCM mode requires a nonce and none (or an empty one) was given.
    #[error("GCM mode requires a nonce but none was provided")]
    MissingNonce,

    /// Key material has the wrong length for the selected primitive.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Key length the primitive requires.
        expected: usize,
        /// Length of the key actually provided.
        actual: usize,
    },

    /// The mode cannot be constructed over the supplied primitive.
    ///
    /// Permanent, not transient: GCM requires a 16-byte-block primitive,
    /// so e.g. DES (8-byte blocks) can never be used with it.
    #[error("cannot construct cipher: {mode} requires a {required}-byte block primitive, got {actual}")]
    IncompatiblePrimitive {
        /// The mode that was requested.
        mode: BlockMode,
        /// Block size the mode requires.
        required: usize,
        /// Block size of the supplied primitive.
        actual: usize,
    },

    /// Input length is not a multiple of the block size under `None` padding.
    #[error("input length {len} is not a multiple of the {block_size}-byte block size")]
    UnalignedInput {
        /// Length of the offending input.
        len: usize,
        /// Block size of the primitive.
        block_size: usize,
    },

    /// Decryption failed: padding did not validate or the authentication
    /// tag did not verify. Corrupt ciphertext, a wrong key, and tampering
    /// are intentionally indistinguishable.
    #[error("decryption failed: integrity check did not pass")]
    Integrity,

    /// The caller's buffer cannot hold the full decrypted output.
    ///
    /// The prefix that fits has already been delivered; only the overflow
    /// is withheld.
    #[error("output buffer too small: {needed} bytes pending, capacity {capacity}")]
    BufferTooSmall {
        /// Bytes that were pending delivery when the call was made.
        needed: usize,
        /// Capacity of the buffer the caller supplied.
        capacity: usize,
    },

    /// The underlying sink or source failed.
    ///
    /// Wrapped so callers can tell an I/O fault from a cryptographic one.
    #[error("I/O error in underlying stream: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_iv_names_the_mode() {
        let err = CipherError::MissingIv {
            mode: BlockMode::Cbc,
        };
        assert_eq!(
            format!("{}", err),
            "CBC mode requires an IV but none was provided"
        );
    }

    #[test]
    fn display_invalid_iv_length_carries_both_sizes() {
        let err = CipherError::InvalidIvLength {
            expected: 8,
            actual: 5,
        };
        assert_eq!(
            format!("{}", err),
            "invalid IV length: expected 8 bytes, got 5"
        );
    }

    #[test]
    fn display_incompatible_primitive() {
        let err = CipherError::IncompatiblePrimitive {
            mode: BlockMode::Gcm,
            required: 16,
            actual: 8,
        };
        assert_eq!(
            format!("{}", err),
            "cannot construct cipher: GCM requires a 16-byte block primitive, got 8"
        );
    }

    #[test]
    fn display_integrity_is_oracle_free() {
        let msg = format!("{}", CipherError::Integrity);
        assert!(!msg.contains("padding"));
        assert!(!msg.contains("tag"));
    }

    #[test]
    fn io_error_converts_via_from() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err = CipherError::from(io);
        assert!(matches!(err, CipherError::Io(_)));
    }
}
