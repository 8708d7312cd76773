/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A decoder feeding the store failed.
    #[error("cannot load triples: {0}")]
    Load(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// I/O error while rendering store contents.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
