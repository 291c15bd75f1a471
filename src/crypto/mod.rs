//! Cryptographic core of Unseal.
//!
//! This module provides:
//! - RSA private-key loading and the zeroizing symmetric key type (`keys`)
//! - Envelope unwrapping — recovering the AES key from its RSA-encrypted
//!   envelope (`envelope`)
//! - Chunked streaming decryption of bulk payloads (`stream`)

pub mod envelope;
pub mod keys;
pub mod stream;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{unwrap_symmetric_key, decrypt_stream, ...};
pub use envelope::{unwrap_symmetric_key, Envelope};
pub use keys::{PrivateKey, SymmetricKey};
pub use stream::decrypt_stream;
