//! modecrypt: block-cipher transformation engine.
//!
//! Turns any fixed-block-size cipher primitive (DES, AES, ...) into a
//! family of symmetric encryption schemes by composing a block mode with
//! a padding scheme, exposed through one-shot and streaming interfaces.
//! The primitive itself is an opaque collaborator: the engine only ever
//! asks it to encrypt or decrypt exactly one block.
//!
//! # Architecture
//!
//! ```text
//! PaddingScheme   (leaf — pure pad/unpad, no state, no I/O)
//! BlockMode       (leaf — ECB / CBC / CTR / CFB / OFB / GCM chaining)
//!     ↑ both consumed by
//! CipherConfig    (mode + padding + IV/nonce/AAD, validated up front)
//!     ↑ bound to a BlockPrimitive by
//! Cipher          (one-shot Encrypt / Decrypt facade)
//!     ↑ wrapped by
//! StreamEncrypter / StreamDecrypter   (incremental write/read)
//! ```
//!
//! # Examples
//!
//! One-shot CBC over DES:
//!
//! ```
//! use modecrypt::{BlockMode, Cipher, CipherConfig, DesPrimitive, PaddingScheme};
//!
//! let des = DesPrimitive::new(b"12345678").unwrap();
//! let config = CipherConfig::new(BlockMode::Cbc, PaddingScheme::Pkcs7)
//!     .with_iv(b"87654321".to_vec());
//! let cipher = Cipher::new(des, config);
//!
//! let ciphertext = cipher.encrypt(b"hello world").unwrap();
//! assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"hello world");
//! ```
//!
//! Authenticated encryption with AES-GCM:
//!
//! ```
//! use modecrypt::{Aes128Primitive, BlockMode, Cipher, CipherConfig, PaddingScheme};
//!
//! let aes = Aes128Primitive::new(b"0123456789abcdef").unwrap();
//! let config = CipherConfig::new(BlockMode::Gcm, PaddingScheme::Pkcs7)
//!     .with_nonce(b"unique nonce".to_vec())
//!     .with_aad(b"header".to_vec());
//! let cipher = Cipher::new(aes, config);
//!
//! let sealed = cipher.encrypt(b"attack at dawn").unwrap();
//! assert_eq!(cipher.decrypt(&sealed).unwrap(), b"attack at dawn");
//! ```
//!
//! # Caller obligations
//!
//! A fresh IV (CBC/CFB/OFB) or nonce (GCM) must never be reused across two
//! encryptions under the same key; the engine documents this precondition
//! but cannot enforce it. A single streaming adapter instance must not be
//! shared across threads without serialization.

#![deny(clippy::all)]

pub mod error;

mod cipher;
mod config;
mod gcm;
mod mode;
mod padding;
mod primitive;
mod stream;

pub use cipher::Cipher;
pub use config::CipherConfig;
pub use error::CipherError;
pub use mode::BlockMode;
pub use padding::PaddingScheme;
pub use primitive::{
    Aes128Primitive, Aes192Primitive, Aes256Primitive, BlockPrimitive, DesPrimitive,
    KeyedPrimitive,
};
pub use stream::{StreamDecrypter, StreamEncrypter};
