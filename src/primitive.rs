//! Block primitive capability: the single-block encrypt/decrypt operation
//! the engine consumes.
//!
//! The engine never sees key schedules or round functions, only an opaque
//! [`BlockPrimitive`] bound to an already-validated key. [`KeyedPrimitive`]
//! bridges any RustCrypto `cipher` block cipher (DES, AES, ...) into that
//! capability, which is the one place key-length validation happens.

use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit, KeySizeUser};
use zeroize::Zeroizing;

use crate::error::CipherError;

/// A fixed-block-size encrypt/decrypt capability bound to a key.
///
/// One invocation transforms exactly one block in place. Implementations
/// must be deterministic and stateless across calls; all chaining lives in
/// the mode engine above this trait.
pub trait BlockPrimitive {
    /// The primitive's fixed block size in bytes.
    fn block_size(&self) -> usize;

    /// Encrypts one block in place. `block` must be exactly
    /// [`block_size`](Self::block_size) bytes.
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypts one block in place. `block` must be exactly
    /// [`block_size`](Self::block_size) bytes.
    fn decrypt_block(&self, block: &mut [u8]);
}

/// Adapter binding a RustCrypto block cipher to [`BlockPrimitive`].
///
/// # Examples
///
/// ```
/// use modecrypt::{BlockPrimitive, DesPrimitive};
///
/// let des = DesPrimitive::new(b"12345678").unwrap();
/// assert_eq!(des.block_size(), 8);
/// ```
#[derive(Debug)]
pub struct KeyedPrimitive<C> {
    cipher: C,
}

impl<C> KeyedPrimitive<C>
where
    C: KeyInit,
{
    /// Builds the key schedule for `key` and wraps the resulting cipher.
    ///
    /// The intermediate copy of the key bytes is wiped once the schedule
    /// is built.
    ///
    /// # Errors
    /// Returns [`CipherError::InvalidKeyLength`] if `key` is not exactly
    /// the length the cipher requires.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != C::key_size() {
            return Err(CipherError::InvalidKeyLength {
                expected: C::key_size(),
                actual: key.len(),
            });
        }
        let key = Zeroizing::new(key.to_vec());
        let cipher = C::new_from_slice(&key).map_err(|_| CipherError::InvalidKeyLength {
            expected: C::key_size(),
            actual: key.len(),
        })?;
        Ok(KeyedPrimitive { cipher })
    }
}

impl<C> BlockPrimitive for KeyedPrimitive<C>
where
    C: BlockEncrypt + BlockDecrypt + BlockSizeUser,
{
    fn block_size(&self) -> usize {
        C::block_size()
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        self.cipher
            .encrypt_block(GenericArray::from_mut_slice(block));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        self.cipher
            .decrypt_block(GenericArray::from_mut_slice(block));
    }
}

/// DES: 8-byte key (parity bits ignored), 8-byte block.
pub type DesPrimitive = KeyedPrimitive<des::Des>;

/// AES-128: 16-byte key, 16-byte block.
pub type Aes128Primitive = KeyedPrimitive<aes::Aes128>;

/// AES-192: 24-byte key, 16-byte block.
pub type Aes192Primitive = KeyedPrimitive<aes::Aes192>;

/// AES-256: 32-byte key, 16-byte block.
pub type Aes256Primitive = KeyedPrimitive<aes::Aes256>;

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn des_known_answer_single_block() {
        // Classic FIPS 46 worked example.
        let des = DesPrimitive::new(&hex!("133457799BBCDFF1")).unwrap();
        let mut block = hex!("0123456789ABCDEF");
        des.encrypt_block(&mut block);
        assert_eq!(block, hex!("85E813540F0AB405"));
        des.decrypt_block(&mut block);
        assert_eq!(block, hex!("0123456789ABCDEF"));
    }

    #[test]
    fn aes128_known_answer_single_block() {
        // FIPS 197 appendix B.
        let aes = Aes128Primitive::new(&hex!("000102030405060708090a0b0c0d0e0f")).unwrap();
        let mut block = hex!("00112233445566778899aabbccddeeff");
        aes.encrypt_block(&mut block);
        assert_eq!(block, hex!("69c4e0d86a7b0430d8cdb78070b4c55a"));
    }

    #[test]
    fn block_sizes() {
        assert_eq!(DesPrimitive::new(b"12345678").unwrap().block_size(), 8);
        assert_eq!(Aes128Primitive::new(&[0u8; 16]).unwrap().block_size(), 16);
        assert_eq!(Aes256Primitive::new(&[0u8; 32]).unwrap().block_size(), 16);
    }

    #[test]
    fn wrong_key_length_is_a_typed_error() {
        let err = DesPrimitive::new(b"123").unwrap_err();
        assert!(matches!(
            err,
            CipherError::InvalidKeyLength {
                expected: 8,
                actual: 3
            }
        ));
    }
}
