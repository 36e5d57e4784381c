use triad_store::StoreError;
use triad_types::TypeError;

/// Message for every path-table rejection.
pub const RESTRICTED_MESSAGE: &str = "That operation is restricted";

/// Message for a mutating request without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You need to log in to do that";

/// Errors that end a request before a handler produced a reply.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Malformed key segment, query parameter or body. No store access
    /// has happened.
    #[error("{0}")]
    Validation(String),

    /// Restricted path, disallowed method on a read-only path, or missing
    /// session on a mutating path.
    #[error("{0}")]
    Authorization(String),

    /// Nothing handles this method and path.
    #[error("{0}")]
    NotFound(String),

    /// Failure reported by the store, forwarded unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The access configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A handler failed in a way no other variant describes.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AccessError {
    pub fn restricted() -> Self {
        Self::Authorization(RESTRICTED_MESSAGE.into())
    }

    pub fn login_required() -> Self {
        Self::Authorization(LOGIN_REQUIRED_MESSAGE.into())
    }

    /// HTTP status class for this failure.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authorization(_) => 401,
            Self::NotFound(_) => 404,
            Self::Store(err) => match err {
                StoreError::NotFound(_) => 404,
                StoreError::AlreadyExists(_) => 409,
                StoreError::InvalidQuery(_) => 400,
                StoreError::Backend(_) => 500,
            },
            Self::Config(_) | Self::Internal(_) => 500,
        }
    }
}

impl From<TypeError> for AccessError {
    fn from(err: TypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for AccessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("response serialization failed: {err}"))
    }
}

/// Result alias for pipeline operations.
pub type AccessResult<T> = Result<T, AccessError>;
