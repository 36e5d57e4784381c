//! Static path classification.
//!
//! Prefixes are matched on whole segments: `/core/user` covers
//! `/core/user` and `/core/user/x/acl` but not `/core/user_private`.
//! When several prefixes cover a path the most severe classification wins.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};
use crate::request::Method;

/// How a path prefix is treated by the path authorization stage.
///
/// Variants are ordered by severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Unrestricted,
    /// Only retrieval is allowed.
    ReadOnly,
    /// Every method is rejected.
    Restricted,
}

impl Classification {
    /// Whether a request with `method` may pass a path of this class.
    pub fn admits(self, method: &Method) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::ReadOnly => *method == Method::Get,
            Self::Restricted => false,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unrestricted => "unrestricted",
            Self::ReadOnly => "read-only",
            Self::Restricted => "restricted",
        })
    }
}

/// Split a request path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[derive(Debug, Default)]
struct Node {
    class: Option<Classification>,
    children: HashMap<String, Node>,
}

/// Segment trie mapping path prefixes to classifications.
///
/// Built once from configuration and never mutated while serving.
#[derive(Debug, Default)]
pub struct PathRules {
    root: Node,
    len: usize,
}

impl PathRules {
    /// An empty table: every path is unrestricted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefix. Registering the same prefix twice keeps the more
    /// severe classification.
    pub fn insert(&mut self, prefix: &str, class: Classification) -> AccessResult<()> {
        let segments = split_path(prefix);
        if segments.is_empty() {
            return Err(AccessError::Config(format!(
                "path prefix {prefix:?} has no segments"
            )));
        }

        let mut node = &mut self.root;
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        match node.class {
            Some(existing) => node.class = Some(existing.max(class)),
            None => {
                node.class = Some(class);
                self.len += 1;
            }
        }
        Ok(())
    }

    /// Builder-style [`Self::insert`].
    pub fn with(mut self, prefix: &str, class: Classification) -> AccessResult<Self> {
        self.insert(prefix, class)?;
        Ok(self)
    }

    /// Number of distinct prefixes registered.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Classify already-split path segments.
    pub fn classify<S: AsRef<str>>(&self, segments: &[S]) -> Classification {
        let mut worst = Classification::Unrestricted;
        let mut node = &self.root;
        for segment in segments {
            match node.children.get(segment.as_ref()) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(class) = node.class {
                worst = worst.max(class);
                if worst == Classification::Restricted {
                    break;
                }
            }
        }
        worst
    }

    /// Classify a raw request path.
    pub fn classify_path(&self, path: &str) -> Classification {
        self.classify(&split_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> PathRules {
        PathRules::new()
            .with("/core/user", Classification::ReadOnly)
            .unwrap()
            .with("/core/user_private", Classification::Restricted)
            .unwrap()
            .with("/core/authorization_token", Classification::Restricted)
            .unwrap()
    }

    #[test]
    fn exact_and_sub_paths() {
        let rules = table();
        assert_eq!(rules.classify_path("/core/user"), Classification::ReadOnly);
        assert_eq!(rules.classify_path("/core/user/ada/acl"), Classification::ReadOnly);
        assert_eq!(
            rules.classify_path("/core/user_private/ada/data"),
            Classification::Restricted
        );
    }

    #[test]
    fn segment_boundaries_are_respected() {
        let rules = table();
        assert_eq!(rules.classify_path("/core/users"), Classification::Unrestricted);
        assert_eq!(rules.classify_path("/core"), Classification::Unrestricted);
        assert_eq!(rules.classify_path("/other/user"), Classification::Unrestricted);
    }

    #[test]
    fn slashes_are_normalized() {
        let rules = table();
        assert_eq!(rules.classify_path("//core//user/"), Classification::ReadOnly);
    }

    #[test]
    fn most_severe_prefix_wins() {
        let rules = PathRules::new()
            .with("/a", Classification::ReadOnly)
            .unwrap()
            .with("/a/b", Classification::Restricted)
            .unwrap();
        assert_eq!(rules.classify_path("/a/x"), Classification::ReadOnly);
        assert_eq!(rules.classify_path("/a/b/c"), Classification::Restricted);

        let rules = PathRules::new()
            .with("/a", Classification::Restricted)
            .unwrap()
            .with("/a/b", Classification::ReadOnly)
            .unwrap();
        assert_eq!(rules.classify_path("/a/b/c"), Classification::Restricted);
    }

    #[test]
    fn duplicate_prefix_keeps_more_severe() {
        let mut rules = PathRules::new();
        rules.insert("/a", Classification::Restricted).unwrap();
        rules.insert("/a/", Classification::ReadOnly).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.classify_path("/a"), Classification::Restricted);
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let mut rules = PathRules::new();
        assert!(matches!(
            rules.insert("/", Classification::Restricted),
            Err(AccessError::Config(_))
        ));
        assert!(rules.is_empty());
    }

    #[test]
    fn admitted_methods() {
        assert!(Classification::Unrestricted.admits(&Method::Other("PATCH".into())));
        assert!(Classification::ReadOnly.admits(&Method::Get));
        assert!(!Classification::ReadOnly.admits(&Method::Post));
        assert!(!Classification::Restricted.admits(&Method::Get));
    }

    #[test]
    fn severity_ordering() {
        assert!(Classification::Restricted > Classification::ReadOnly);
        assert!(Classification::ReadOnly > Classification::Unrestricted);
        assert_eq!(Classification::ReadOnly.to_string(), "read-only");
    }

    proptest! {
        #[test]
        fn everything_under_a_restricted_prefix_is_restricted(
            rest in proptest::collection::vec("[a-z0-9_]{1,6}", 0..4)
        ) {
            let rules = table();
            let path = format!("/core/user_private/{}", rest.join("/"));
            prop_assert_eq!(rules.classify_path(&path), Classification::Restricted);
        }

        #[test]
        fn unrelated_namespaces_are_unrestricted(
            ns in "[a-z]{1,8}",
            rest in proptest::collection::vec("[a-z0-9_]{1,6}", 0..4)
        ) {
            prop_assume!(ns != "core");
            let rules = table();
            let path = format!("/{ns}/{}", rest.join("/"));
            prop_assert_eq!(rules.classify_path(&path), Classification::Unrestricted);
        }
    }
}
