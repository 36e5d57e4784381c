/// Errors from store operations.
///
/// The access layer forwards these unchanged; the variant only decides the
/// class of failure reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed item does not exist.
    #[error("item not found: {0}")]
    NotFound(String),

    /// An item with the proposed identifier already exists.
    #[error("item already exists: {0}")]
    AlreadyExists(String),

    /// The list query could not be translated into a store query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Any other failure inside the storage backend.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
