//! Streaming Adapters: incremental write/read over an underlying byte
//! sink/source.
//!
//! The adapters own a small amount of mutable state (prior-error check,
//! decrypted buffer, read cursor), so a single instance is not safe for
//! concurrent use — callers serialize access or use one instance per
//! thread. Independent instances share nothing.
//!
//! Framing contract: each [`StreamEncrypter::write`] call independently
//! pads-and-encrypts exactly the bytes passed to it. Two small writes are
//! therefore NOT equivalent to one combined write, and a source fed to
//! [`StreamDecrypter`] must hold exactly one such encryption unit.

use std::io::{Read, Write};

use crate::cipher::Cipher;
use crate::error::CipherError;
use crate::primitive::BlockPrimitive;

/// Encrypting adapter over a byte sink.
///
/// # Examples
///
/// ```
/// use modecrypt::{BlockMode, Cipher, CipherConfig, DesPrimitive, PaddingScheme};
/// use modecrypt::StreamEncrypter;
///
/// let des = DesPrimitive::new(b"12345678").unwrap();
/// let config = CipherConfig::new(BlockMode::Cbc, PaddingScheme::Pkcs7)
///     .with_iv(b"87654321".to_vec());
/// let mut enc = StreamEncrypter::new(Cipher::new(des, config), Vec::new());
///
/// assert_eq!(enc.write(b"hello world").unwrap(), 11);
/// let sink = enc.finish().unwrap();
/// assert_eq!(sink.len(), 16);
/// ```
pub struct StreamEncrypter<P, W> {
    cipher: Cipher<P>,
    sink: W,
}

impl<P: BlockPrimitive, W: Write> StreamEncrypter<P, W> {
    /// Wraps `sink` with an encrypting writer.
    ///
    /// Never fails: an invalid configuration is re-reported from every
    /// subsequent [`write`](Self::write) and [`finish`](Self::finish)
    /// without the sink being touched.
    pub fn new(cipher: Cipher<P>, sink: W) -> Self {
        StreamEncrypter { cipher, sink }
    }

    /// Pads-and-encrypts `chunk` and forwards the ciphertext to the sink.
    ///
    /// # Returns
    /// The number of *plaintext* bytes accepted (always `chunk.len()` on
    /// success), not the number of ciphertext bytes written, which is
    /// larger under any padding scheme. An empty chunk is a no-op
    /// returning `Ok(0)`.
    ///
    /// # Errors
    /// A recorded configuration error, re-reported before the sink is
    /// touched; [`CipherError::UnalignedInput`] under `None` padding; or
    /// [`CipherError::Io`] if the sink fails.
    pub fn write(&mut self, chunk: &[u8]) -> Result<usize, CipherError> {
        self.cipher.config().validate(self.cipher.block_size())?;
        if chunk.is_empty() {
            return Ok(0);
        }
        let ciphertext = self.cipher.encrypt(chunk)?;
        self.sink.write_all(&ciphertext)?;
        Ok(chunk.len())
    }

    /// Flushes and releases the sink.
    ///
    /// # Errors
    /// A recorded configuration error is returned here too, never
    /// swallowed; otherwise only the sink's own flush failure.
    pub fn finish(mut self) -> Result<W, CipherError> {
        self.cipher.config().validate(self.cipher.block_size())?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Decrypting adapter over a byte source.
///
/// The first [`read`](Self::read) drains the entire remaining source:
/// block chaining needs the whole unit before padding or tags can
/// validate, so bounded streaming is not offered.
pub struct StreamDecrypter<P, R> {
    cipher: Cipher<P>,
    source: R,
    plaintext: Vec<u8>,
    pos: usize,
    drained: bool,
}

impl<P: BlockPrimitive, R: Read> StreamDecrypter<P, R> {
    /// Wraps `source` with a decrypting reader.
    ///
    /// Never fails; an invalid configuration is re-reported from every
    /// subsequent [`read`](Self::read).
    pub fn new(cipher: Cipher<P>, source: R) -> Self {
        StreamDecrypter {
            cipher,
            source,
            plaintext: Vec::new(),
            pos: 0,
            drained: false,
        }
    }

    /// Copies decrypted plaintext into `buf`.
    ///
    /// # Returns
    /// The number of bytes copied. `Ok(0)` signals end-of-data: either all
    /// plaintext has been consumed by earlier reads, or the source was
    /// empty to begin with.
    ///
    /// # Errors
    /// [`CipherError::BufferTooSmall`] when `buf` cannot hold everything
    /// still pending: `buf` has been completely filled (that prefix is
    /// delivered and the cursor advances; no data loss), and the error
    /// carries the pending size and `buf`'s capacity so the caller knows
    /// exactly how much was truncated. A subsequent `read` continues with
    /// the remainder. Also: a recorded configuration error (re-reported),
    /// [`CipherError::Integrity`] for corrupt ciphertext, or
    /// [`CipherError::Io`] if draining the source fails.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, CipherError> {
        self.cipher.config().validate(self.cipher.block_size())?;
        if !self.drained {
            let mut ciphertext = Vec::new();
            self.source.read_to_end(&mut ciphertext)?;
            self.plaintext = self.cipher.decrypt(&ciphertext)?;
            self.drained = true;
        }
        let pending = self.plaintext.len() - self.pos;
        if pending == 0 {
            return Ok(0);
        }
        let n = buf.len().min(pending);
        buf[..n].copy_from_slice(&self.plaintext[self.pos..self.pos + n]);
        self.pos += n;
        if n < pending {
            return Err(CipherError::BufferTooSmall {
                needed: pending,
                capacity: buf.len(),
            });
        }
        Ok(n)
    }
}
