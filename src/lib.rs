//! Unseal — batch decryption of hybrid-encrypted archives.
//!
//! The archives follow the classic envelope pattern: each file is
//! encrypted with a per-batch AES key, and that key is itself encrypted
//! under an RSA public key (the "envelope").  Unseal recovers the AES key
//! with the RSA private key, then streams every file from source to
//! destination through the shared key.
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use unseal::{unwrap_symmetric_key, Envelope, PrivateKey, Settings};
//!
//! # fn main() -> unseal::Result<()> {
//! let settings = Settings::default();
//! let private_key = PrivateKey::from_pkcs8_der_file(Path::new("keys/private.der"))?;
//! let envelope = Envelope::from_file(Path::new("keys/aes.key"))?;
//! let key = unwrap_symmetric_key(&private_key, &envelope, &settings)?;
//!
//! let sources: Vec<PathBuf> = std::fs::read_dir("encrypted")?
//!     .filter_map(|e| e.ok().map(|e| e.path()))
//!     .collect();
//! let outcomes = unseal::run_batch_files(
//!     &key,
//!     &sources,
//!     |src: &Path| PathBuf::from("decrypted").join(src.file_name().unwrap()),
//!     &settings,
//! );
//! for (source, outcome) in sources.iter().zip(&outcomes) {
//!     if let Some(err) = outcome.error() {
//!         eprintln!("{}: {err}", source.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod crypto;
pub mod errors;

pub use batch::{
    decrypt_file, run_batch, run_batch_files, run_batch_with_cancel, ItemOutcome, WorkItem,
};
#[cfg(feature = "parallel")]
pub use batch::run_batch_parallel;
pub use config::{BulkCipher, CipherMode, KeyAlgorithm, KeyTransport, Settings};
pub use crypto::envelope::{unwrap_symmetric_key, Envelope};
pub use crypto::keys::{PrivateKey, SymmetricKey};
pub use crypto::stream::decrypt_stream;
pub use errors::{Result, UnsealError};
