use std::collections::BTreeMap;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use tracing::debug;
use triad_types::{Identity, Session};

use crate::error::ServerResult;

/// What the caller presented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read an `Authorization: Bearer <token>` header. Anything else is
    /// anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(value) = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            return Self::Anonymous;
        };
        match value.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
                let token = token.trim();
                if token.is_empty() {
                    Self::Anonymous
                } else {
                    Self::Bearer(token.to_string())
                }
            }
            _ => Self::Anonymous,
        }
    }
}

/// Establishes the session for a request.
///
/// Credentials that do not identify anyone yield an anonymous session; the
/// pipeline decides what an anonymous caller may do.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Session>;
}

/// Treats every caller as anonymous.
pub struct AnonymousSessions;

#[async_trait]
impl SessionProvider for AnonymousSessions {
    async fn authenticate(&self, _credentials: &Credentials) -> ServerResult<Session> {
        Ok(Session::Anonymous)
    }
}

/// A fixed table of bearer tokens to user names.
pub struct StaticTokenSessions {
    tokens: BTreeMap<String, String>,
}

impl StaticTokenSessions {
    pub fn new(tokens: BTreeMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl SessionProvider for StaticTokenSessions {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Session> {
        let Credentials::Bearer(token) = credentials else {
            return Ok(Session::Anonymous);
        };
        match self.tokens.get(token) {
            Some(user) => Ok(Session::Authenticated(Identity::user(user.clone()))),
            None => {
                debug!("unknown bearer token");
                Ok(Session::Anonymous)
            }
        }
    }
}
