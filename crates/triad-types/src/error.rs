use thiserror::Error;

/// Errors produced when parsing or validating foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid namespace {value:?}: {reason}")]
    InvalidNamespace { value: String, reason: String },

    #[error("invalid type id {value:?}: {reason}")]
    InvalidTypeId { value: String, reason: String },

    #[error("invalid item id {value:?}: {reason}")]
    InvalidItemId { value: String, reason: String },

    #[error("invalid reference {0:?}: expected <namespace>/<type>/<item>")]
    InvalidReference(String),
}
