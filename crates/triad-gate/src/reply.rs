use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AccessError, AccessResult};

/// Acknowledgment body for update, append, update-acl and delete.
pub const SUCCESS: &str = "Success";

/// A terminal response produced by a stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// Serialize `value` into a 200 reply.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> AccessResult<Self> {
        Ok(Self::ok(serde_json::to_value(value)?))
    }

    pub fn success() -> Self {
        Self::ok(Value::String(SUCCESS.into()))
    }

    /// Structured `{"message": ...}` reply with an explicit status.
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::message(404, message)
    }

    /// The uniform failure reply for an error that ended the request.
    pub fn from_error(err: &AccessError) -> Self {
        Self::message(err.status(), err.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
