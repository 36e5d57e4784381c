use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use triad_types::{Item, KeyTriple, Payload, Session};

use crate::error::{AccessError, AccessResult};
use crate::route::{Operation, Target};
use crate::rules::{split_path, Classification};
use crate::stage::StageRecord;

/// Request method. Anything outside the four routed verbs is kept verbatim
/// so restricted paths can still reject it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query string as received from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawQuery {
    Params(BTreeMap<String, String>),
    /// The transport could not decode the query string.
    Malformed(String),
}

impl Default for RawQuery {
    fn default() -> Self {
        Self::Params(BTreeMap::new())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Request body as received from the transport. Bodies are only inspected
/// by handlers that need one.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// The body was not valid JSON.
    Malformed(String),
}

impl RequestBody {
    /// Parse raw bytes; empty input is [`RequestBody::Empty`].
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(err) => Self::Malformed(err.to_string()),
        }
    }

    /// The body as a JSON object. Anything else is a validation error.
    pub fn object(&self) -> AccessResult<Payload> {
        match self {
            Self::Json(Value::Object(map)) => Ok(map.clone()),
            Self::Json(_) => Err(AccessError::Validation(
                "request body must be a JSON object".into(),
            )),
            Self::Empty => Err(AccessError::Validation("request body is required".into())),
            Self::Malformed(reason) => Err(AccessError::Validation(format!(
                "request body is not valid JSON: {reason}"
            ))),
        }
    }

    /// Like [`Self::object`], but an absent body is an empty object.
    pub fn object_or_empty(&self) -> AccessResult<Payload> {
        match self {
            Self::Empty => Ok(Payload::new()),
            _ => self.object(),
        }
    }
}

/// Per-request state threaded through every stage.
///
/// The transport fills in the raw request; stages record what they
/// establish (classification, target, operation, the resolved item) for
/// the stages after them. Dropped when the request ends.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub segments: Vec<String>,
    pub query: RawQuery,
    pub body: RequestBody,
    pub session: Session,

    pub classification: Classification,
    pub target: Option<Target>,
    pub operation: Option<Operation>,
    pub item: Option<Item>,

    /// Results from stages that have already run.
    pub trail: Vec<StageRecord>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let segments = split_path(&path).into_iter().map(str::to_string).collect();
        Self {
            method,
            path,
            segments,
            query: RawQuery::default(),
            body: RequestBody::Empty,
            session: Session::Anonymous,
            classification: Classification::Unrestricted,
            target: None,
            operation: None,
            item: None,
            trail: Vec::new(),
        }
    }

    pub fn with_query(mut self, query: RawQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_json(self, body: Value) -> Self {
        self.with_body(RequestBody::Json(body))
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// The item key of an item-scoped target.
    pub fn key(&self) -> AccessResult<&KeyTriple> {
        self.target
            .as_ref()
            .and_then(Target::key)
            .ok_or_else(|| AccessError::Internal("request has no item-scoped target".into()))
    }

    /// The item loaded by the resolver stage.
    pub fn resolved_item_mut(&mut self) -> AccessResult<&mut Item> {
        self.item
            .as_mut()
            .ok_or_else(|| AccessError::Internal("item was not resolved".into()))
    }

    /// Names of the stages that ran, in order.
    pub fn stages_run(&self) -> Vec<&str> {
        self.trail.iter().map(|r| r.stage.as_str()).collect()
    }
}
