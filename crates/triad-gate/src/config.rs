use serde::{Deserialize, Serialize};

use crate::error::AccessResult;
use crate::rules::{Classification, PathRules};

/// The externally configured path table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Prefixes rejected for every method.
    pub restricted: Vec<String>,
    /// Prefixes that only allow retrieval.
    pub read_only: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            restricted: vec![
                "/core/user_private".into(),
                "/core/authorization_token".into(),
            ],
            read_only: vec!["/core/user".into()],
        }
    }
}

impl AccessConfig {
    /// A table with no restrictions at all.
    pub fn open() -> Self {
        Self {
            restricted: Vec::new(),
            read_only: Vec::new(),
        }
    }

    /// Compile the table into a prefix matcher.
    pub fn rules(&self) -> AccessResult<PathRules> {
        let mut rules = PathRules::new();
        for prefix in &self.restricted {
            rules.insert(prefix, Classification::Restricted)?;
        }
        for prefix in &self.read_only {
            rules.insert(prefix, Classification::ReadOnly)?;
        }
        Ok(rules)
    }
}
