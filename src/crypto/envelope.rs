//! Envelope unwrapping: recovering the symmetric key with the private key.
//!
//! The envelope is the symmetric key encrypted under the RSA public key,
//! stored alongside the bulk-encrypted data.  Unwrapping is a pure,
//! deterministic operation — the same (private key, envelope) pair always
//! yields the same symmetric key — and is performed exactly once per
//! batch run.

use std::path::Path;

use rsa::{BigUint, Oaep, Pkcs1v15Encrypt};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::config::{KeyTransport, Settings};
use crate::crypto::keys::{PrivateKey, SymmetricKey};
use crate::errors::{Result, UnsealError};

/// The wrapped symmetric key: a fixed-length encrypted byte sequence whose
/// length equals the RSA modulus size.  Read once, consumed, never mutated.
pub struct Envelope {
    bytes: Vec<u8>,
}

impl Envelope {
    /// Wrap raw envelope bytes.  Length is validated against the modulus
    /// size at unwrap time, once the private key is known.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read an envelope blob from `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// Envelope length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Decrypt the envelope with the private key and form the symmetric key.
///
/// The key-transport padding scheme comes from `settings.key_transport`
/// and MUST match the scheme used when the envelope was produced.  With
/// the legacy `raw` transport a mismatch yields garbage key bytes rather
/// than an error; the padded transports reject mismatches outright.
///
/// The decrypted output is interpreted as exactly
/// `settings.symmetric_key_bits / 8` leading bytes.  Fails with
/// [`UnsealError::KeyUnwrap`] when the envelope length does not equal the
/// modulus size, the ciphertext cannot be decrypted, or fewer plaintext
/// bytes than the key length are recovered.
pub fn unwrap_symmetric_key(
    private_key: &PrivateKey,
    envelope: &Envelope,
    settings: &Settings,
) -> Result<SymmetricKey> {
    let key_len = settings.symmetric_key_len()?;
    let modulus_len = private_key.modulus_len();

    if envelope.len() != modulus_len {
        return Err(UnsealError::KeyUnwrap(format!(
            "envelope is {} bytes, expected the modulus size ({} bytes)",
            envelope.len(),
            modulus_len
        )));
    }

    let mut plaintext = match settings.key_transport {
        KeyTransport::Raw => raw_decrypt(private_key, envelope.as_bytes(), modulus_len)?,
        KeyTransport::Pkcs1v15 => private_key
            .inner()
            .decrypt(Pkcs1v15Encrypt, envelope.as_bytes())
            .map_err(|e| UnsealError::KeyUnwrap(format!("PKCS#1 v1.5 unwrap failed: {e}")))?,
        KeyTransport::OaepSha256 => private_key
            .inner()
            .decrypt(Oaep::new::<Sha256>(), envelope.as_bytes())
            .map_err(|e| UnsealError::KeyUnwrap(format!("OAEP unwrap failed: {e}")))?,
    };

    if plaintext.len() < key_len {
        let got = plaintext.len();
        plaintext.zeroize();
        return Err(UnsealError::KeyUnwrap(format!(
            "unwrapped key is {got} bytes, need at least {key_len}"
        )));
    }

    let key = SymmetricKey::from_bytes(plaintext[..key_len].to_vec());
    plaintext.zeroize();
    key
}

/// Textbook RSA decrypt: `m = c^d mod n`, left-padded to the modulus size.
///
/// The symmetric key occupies the leading bytes of the padded plaintext,
/// matching the original encryptor, which reads the key off the head of
/// the raw-decrypted block.
fn raw_decrypt(private_key: &PrivateKey, ciphertext: &[u8], modulus_len: usize) -> Result<Vec<u8>> {
    use rsa::traits::{PrivateKeyParts, PublicKeyParts};

    let inner = private_key.inner();
    let c = BigUint::from_bytes_be(ciphertext);
    if &c >= inner.n() {
        return Err(UnsealError::KeyUnwrap(
            "envelope value is not smaller than the RSA modulus".to_string(),
        ));
    }

    let m = c.modpow(inner.d(), inner.n());
    let mut digits = m.to_bytes_be();

    // Restore the leading zeros dropped by the integer conversion so the
    // plaintext is exactly one modulus-sized block again.
    let mut plaintext = vec![0u8; modulus_len - digits.len()];
    plaintext.extend_from_slice(&digits);
    digits.zeroize();

    Ok(plaintext)
}
