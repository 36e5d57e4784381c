use serde::{Deserialize, Serialize};

/// An authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
}

impl Identity {
    pub fn user(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Whatever the session collaborator established for the current request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Anonymous => None,
        }
    }
}
