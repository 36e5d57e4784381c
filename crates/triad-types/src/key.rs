//! Key triple components and their format rules.
//!
//! Valid namespaces and type ids:
//! - 1 to 64 characters
//! - Start with an ASCII letter
//! - Continue with ASCII letters, digits or `_`
//!
//! Valid item ids:
//! - 1 to 128 characters
//! - ASCII letters, digits, `_`, `-` and `.`
//! - Not `.` or `..` on their own

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const MAX_NAME_LEN: usize = 64;
const MAX_ITEM_ID_LEN: usize = 128;

fn check_name(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".into());
    }

    if value.len() > MAX_NAME_LEN {
        return Err(format!("must be at most {MAX_NAME_LEN} characters"));
    }

    match value.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return Err("must start with an ASCII letter".into()),
    }

    if let Some(ch) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(format!("contains forbidden character: {ch:?}"));
    }

    Ok(())
}

fn check_item_id(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".into());
    }

    if value.len() > MAX_ITEM_ID_LEN {
        return Err(format!("must be at most {MAX_ITEM_ID_LEN} characters"));
    }

    if value == "." || value == ".." {
        return Err("must not be a relative path component".into());
    }

    if let Some(ch) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(format!("contains forbidden character: {ch:?}"));
    }

    Ok(())
}

macro_rules! key_component {
    ($(#[$doc:meta])* $name:ident, $check:ident, $variant:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a raw path segment.
            pub fn parse(value: impl Into<String>) -> Result<Self, TypeError> {
                let value = value.into();
                match $check(&value) {
                    Ok(()) => Ok(Self(value)),
                    Err(reason) => Err(TypeError::$variant { value, reason }),
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

key_component!(
    /// Top-level partition of the address space.
    Namespace,
    check_name,
    InvalidNamespace
);

key_component!(
    /// A collection of items within a namespace.
    TypeId,
    check_name,
    InvalidTypeId
);

key_component!(
    /// Identifier of a single item within a namespace and type.
    ItemId,
    check_item_id,
    InvalidItemId
);

/// Address of a type: `(namespace, type)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeKey {
    pub namespace: Namespace,
    pub type_id: TypeId,
}

impl TypeKey {
    pub fn new(namespace: Namespace, type_id: TypeId) -> Self {
        Self { namespace, type_id }
    }

    /// Extend this type address with an item id.
    pub fn item(&self, item_id: ItemId) -> KeyTriple {
        KeyTriple {
            namespace: self.namespace.clone(),
            type_id: self.type_id.clone(),
            item_id,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.type_id)
    }
}

/// The sole addressing unit: `(namespace, type, item)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyTriple {
    pub namespace: Namespace,
    pub type_id: TypeId,
    pub item_id: ItemId,
}

impl KeyTriple {
    pub fn new(namespace: Namespace, type_id: TypeId, item_id: ItemId) -> Self {
        Self {
            namespace,
            type_id,
            item_id,
        }
    }

    /// Parse all three components, validating each independently.
    pub fn parse(namespace: &str, type_id: &str, item_id: &str) -> Result<Self, TypeError> {
        Ok(Self {
            namespace: Namespace::parse(namespace)?,
            type_id: TypeId::parse(type_id)?,
            item_id: ItemId::parse(item_id)?,
        })
    }

    /// The `(namespace, type)` this item belongs to.
    pub fn type_key(&self) -> TypeKey {
        TypeKey::new(self.namespace.clone(), self.type_id.clone())
    }
}

impl fmt::Display for KeyTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.type_id, self.item_id)
    }
}

/// Parses the `<namespace>/<type>/<item>` form used by references.
impl FromStr for KeyTriple {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(ns), Some(ty), Some(id), None) => Self::parse(ns, ty, id),
            _ => Err(TypeError::InvalidReference(s.to_string())),
        }
    }
}
