//! Format validation for path segments and list parameters.
//!
//! Accepted list parameters:
//! - `filter`: a JSON object
//! - `sort`: a field name, optionally prefixed with `-` (descending) or `+`
//! - `pageSize`: an integer of at least 1
//! - `skip`: a non-negative integer

use std::collections::BTreeMap;

use serde_json::Value;
use triad_store::{ListParams, ID_FIELD};
use triad_types::{ItemId, Namespace, TypeId};

use crate::error::{AccessError, AccessResult};
use crate::request::RawQuery;

pub const FILTER: &str = "filter";
pub const SORT: &str = "sort";
pub const PAGE_SIZE: &str = "pageSize";
pub const SKIP: &str = "skip";

/// Validation collaborator. Every check is pure; none touches the store.
///
/// The provided methods apply the standard rules; implementors override
/// only what they need to tighten.
pub trait Validator: Send + Sync {
    fn namespace(&self, raw: &str) -> AccessResult<Namespace> {
        Ok(Namespace::parse(raw)?)
    }

    fn type_id(&self, raw: &str) -> AccessResult<TypeId> {
        Ok(TypeId::parse(raw)?)
    }

    fn item_id(&self, raw: &str) -> AccessResult<ItemId> {
        Ok(ItemId::parse(raw)?)
    }

    fn list_params(&self, raw: &RawQuery) -> AccessResult<ListParams> {
        match raw {
            RawQuery::Params(params) => parse_list_params(params).map_err(AccessError::Validation),
            RawQuery::Malformed(reason) => Err(AccessError::Validation(format!(
                "malformed query string: {reason}"
            ))),
        }
    }
}

/// The standard rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {}

fn valid_sort_field(field: &str) -> bool {
    if field == ID_FIELD {
        return true;
    }
    let mut chars = field.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Shape-check raw list parameters.
pub fn parse_list_params(raw: &BTreeMap<String, String>) -> Result<ListParams, String> {
    let mut params = ListParams::default();

    for (key, value) in raw {
        match key.as_str() {
            FILTER => match serde_json::from_str::<Value>(value) {
                Ok(Value::Object(filter)) => params.filter = Some(filter),
                Ok(_) => return Err("filter must be a JSON object".into()),
                Err(err) => return Err(format!("filter is not valid JSON: {err}")),
            },
            SORT => {
                let field = value
                    .strip_prefix('-')
                    .or_else(|| value.strip_prefix('+'))
                    .unwrap_or(value.as_str());
                if !valid_sort_field(field) {
                    return Err(format!("invalid sort field: {value:?}"));
                }
                params.sort = Some(value.clone());
            }
            PAGE_SIZE => match value.parse::<usize>() {
                Ok(0) => return Err("pageSize must be at least 1".into()),
                Ok(n) => params.page_size = Some(n),
                Err(_) => return Err(format!("pageSize must be a positive integer, got {value:?}")),
            },
            SKIP => match value.parse::<usize>() {
                Ok(n) => params.skip = Some(n),
                Err(_) => return Err(format!("skip must be a non-negative integer, got {value:?}")),
            },
            other => return Err(format!("unknown list parameter: {other:?}")),
        }
    }

    Ok(params)
}
