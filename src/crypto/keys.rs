//! Key material: the RSA private key and the recovered symmetric key.
//!
//! The private key exists only to unwrap the envelope; it is parsed once
//! from a PKCS#8 DER blob and never persisted.  The symmetric key is the
//! one piece of state shared across the whole batch run — it is immutable
//! after construction and zeroizes its memory on drop.

use std::fmt;
use std::path::Path;

use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, UnsealError};

/// RSA private key handle used for envelope unwrapping.
///
/// Constructed from a PKCS#8 DER blob (algorithm identifier + key bytes).
/// The raw input bytes are not retained beyond the parse call.
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// Parse a PKCS#8 DER private-key blob.
    ///
    /// Fails with [`UnsealError::KeyFormat`] if the blob is malformed,
    /// truncated, or declares an algorithm other than RSA.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let inner = RsaPrivateKey::from_pkcs8_der(der).map_err(|e| {
            UnsealError::KeyFormat(format!("not a valid PKCS#8 RSA private key: {e}"))
        })?;
        Ok(Self { inner })
    }

    /// Read a PKCS#8 DER blob from `path` and parse it.
    pub fn from_pkcs8_der_file(path: &Path) -> Result<Self> {
        let der = std::fs::read(path)?;
        Self::from_pkcs8_der(&der)
    }

    /// Size of the RSA modulus in bytes.
    ///
    /// This is also the exact length a valid envelope must have.
    pub fn modulus_len(&self) -> usize {
        use rsa::traits::PublicKeyParts;
        self.inner.size()
    }

    pub(crate) fn inner(&self) -> &RsaPrivateKey {
        &self.inner
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// Symmetric (AES) key recovered from the envelope.
///
/// Exactly `symmetric_key_bits / 8` bytes.  Shared read-only by every
/// decryption in the batch; its lifetime spans the whole run and its
/// memory is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
}

impl SymmetricKey {
    /// Accepted AES key lengths in bytes.
    const VALID_LENGTHS: [usize; 3] = [16, 24, 32];

    /// Create a symmetric key from raw bytes.
    ///
    /// Fails with [`UnsealError::KeyUnwrap`] unless the length is a valid
    /// AES key size (16, 24 or 32 bytes).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if !Self::VALID_LENGTHS.contains(&bytes.len()) {
            return Err(UnsealError::KeyUnwrap(format!(
                "invalid symmetric key length: {} bytes (expected 16, 24 or 32)",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }

    /// Access the raw key bytes (e.g. to initialize a cipher).
    ///
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A key is never empty; provided for clippy's sake.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey([REDACTED; {} bytes])", self.bytes.len())
    }
}
