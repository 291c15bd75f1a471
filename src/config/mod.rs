//! Configuration for the decryption pipeline.

pub mod settings;

pub use settings::{BulkCipher, CipherMode, KeyAlgorithm, KeyTransport, Settings};
