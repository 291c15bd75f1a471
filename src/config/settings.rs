use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UnsealError};

/// Key-transport padding scheme used when the symmetric key was wrapped.
///
/// The scheme MUST match the one used at encryption time: a mismatched
/// padding does not necessarily error — raw RSA in particular will happily
/// produce garbage key bytes — so this is a correctness-critical setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyTransport {
    /// Textbook (unpadded) RSA.  Legacy default, kept for interoperability
    /// with archives produced by the original encryptor.  Do not use for
    /// new deployments.
    #[default]
    Raw,
    /// PKCS#1 v1.5 encryption padding.
    Pkcs1v15,
    /// RSA-OAEP with SHA-256.  Preferred for new deployments.
    OaepSha256,
}

/// Block-cipher mode for the bulk payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CipherMode {
    /// ECB with PKCS#7 padding.  Legacy default — ECB leaks block-level
    /// structure and should only be used to read existing archives.
    #[default]
    Ecb,
    /// CBC with PKCS#7 padding; the 16-byte IV is read from the head of
    /// the ciphertext stream.
    Cbc,
}

/// Key-transport algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyAlgorithm {
    /// RSA is the only supported transport algorithm.
    #[default]
    Rsa,
}

/// Bulk-cipher algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulkCipher {
    /// AES is the only supported bulk cipher.
    #[default]
    Aes,
}

/// Pipeline configuration, loaded from `.unseal.toml`.
///
/// Every field has a default matching the legacy archive format, so the
/// crate works out-of-the-box without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Symmetric key size in bits (default: 128; 128, 192 and 256 accepted).
    #[serde(default = "default_symmetric_key_bits")]
    pub symmetric_key_bits: u32,

    /// Key-transport padding scheme (default: `raw`).
    #[serde(default)]
    pub key_transport: KeyTransport,

    /// Block-cipher mode for the payload (default: `ecb`).
    #[serde(default)]
    pub cipher_mode: CipherMode,

    /// Key-transport algorithm (default and only value: `rsa`).
    #[serde(default)]
    pub asymmetric_algorithm: KeyAlgorithm,

    /// Bulk-cipher algorithm (default and only value: `aes`).
    #[serde(default)]
    pub symmetric_algorithm: BulkCipher,

    /// Read-chunk size in bytes for streaming decryption (default: 1024).
    /// Must be a positive multiple of the 16-byte AES block size.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_symmetric_key_bits() -> u32 {
    128
}

fn default_chunk_size() -> usize {
    1024
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            symmetric_key_bits: default_symmetric_key_bits(),
            key_transport: KeyTransport::default(),
            cipher_mode: CipherMode::default(),
            asymmetric_algorithm: KeyAlgorithm::default(),
            symmetric_algorithm: BulkCipher::default(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".unseal.toml";

    /// Load settings from `<project_dir>/.unseal.toml`.
    ///
    /// If the file does not exist, the legacy-compatible defaults are
    /// returned.  If the file exists but cannot be parsed or fails
    /// validation, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| UnsealError::Config(format!("cannot read {}: {e}", config_path.display())))?;

        let settings: Settings = toml::from_str(&contents)
            .map_err(|e| UnsealError::Config(format!("cannot parse {}: {e}", config_path.display())))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings describe a cipher suite we can construct.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.symmetric_key_bits, 128 | 192 | 256) {
            return Err(UnsealError::Config(format!(
                "symmetric_key_bits must be 128, 192 or 256 (got {})",
                self.symmetric_key_bits
            )));
        }
        if self.chunk_size == 0 || self.chunk_size % 16 != 0 {
            return Err(UnsealError::Config(format!(
                "chunk_size must be a positive multiple of 16 (got {})",
                self.chunk_size
            )));
        }
        Ok(())
    }

    /// Symmetric key length in bytes.
    pub fn symmetric_key_len(&self) -> Result<usize> {
        self.validate()?;
        Ok(self.symmetric_key_bits as usize / 8)
    }
}
