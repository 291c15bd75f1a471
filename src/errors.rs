use thiserror::Error;

/// All errors that can occur in Unseal.
///
/// `KeyFormat` and `KeyUnwrap` are fatal to a whole batch run: without a
/// valid symmetric key no item can be decrypted, so they surface before the
/// batch coordinator is ever invoked.  `Decryption` and `Io` are local to a
/// single work item and are recorded in that item's outcome instead of
/// aborting the batch.
#[derive(Debug, Error)]
pub enum UnsealError {
    // --- Fatal key errors ---
    #[error("Invalid private key: {0}")]
    KeyFormat(String),

    #[error("Cannot unwrap symmetric key: {0}")]
    KeyUnwrap(String),

    // --- Per-item errors ---
    #[error("Decryption failed — wrong key or corrupted ciphertext: {0}")]
    Decryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config error: {0}")]
    Config(String),
}

impl UnsealError {
    /// True for errors that invalidate the whole batch rather than a
    /// single work item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, UnsealError::KeyFormat(_) | UnsealError::KeyUnwrap(_))
    }
}

/// Convenience type alias for Unseal results.
pub type Result<T> = std::result::Result<T, UnsealError>;
