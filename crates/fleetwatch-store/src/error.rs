/// Errors raised while reading or writing a feed mirror.
///
/// The store itself never fails a mutation because of its mirror; these
/// errors surface from [`crate::mirror::FeedMirror`] implementations and
/// are logged by the store.
///
/// # Examples
///
/// ```rust
/// use fleetwatch_store::error::StoreError;
///
/// let err = StoreError::Other("mirror is read-only".to_string());
/// assert!(err.to_string().contains("read-only"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the mirror file failed.
    #[error("Store: I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be serialized or parsed.
    #[error("Store: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store: {0}")]
    Other(String),
}

/// Convenience `Result` alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
