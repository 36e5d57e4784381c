use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Access control list attached to a key triple.
///
/// The contents are opaque at this layer: the store decides what they mean.
/// Serializes transparently as the wrapped JSON value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acl(pub Value);

impl Acl {
    /// The ACL reported for a key that has never had one written.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl Default for Acl {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Acl {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
