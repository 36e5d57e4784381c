//! List query types.
//!
//! [`ListParams`] is what a client asked for, already shape-checked.
//! [`ListQuery`] is the store-native form produced by
//! [`Store::build_list_query`](crate::Store::build_list_query): a parsed
//! [`Filter`], an optional [`Sort`], and normalized paging.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use triad_types::Item;

/// Field name that addresses the item identifier instead of a payload field.
pub const ID_FIELD: &str = "$id";

/// Client list parameters after shape validation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub filter: Option<Map<String, Value>>,
    pub sort: Option<String>,
    pub page_size: Option<usize>,
    pub skip: Option<usize>,
}

/// Comparison applied by a single filter condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl CompareOp {
    /// Parse a client operator such as `$gte`.
    pub fn from_operator(op: &str) -> Option<Self> {
        match op {
            "$eq" => Some(Self::Eq),
            "$ne" => Some(Self::Ne),
            "$gt" => Some(Self::Gt),
            "$gte" => Some(Self::Gte),
            "$lt" => Some(Self::Lt),
            "$lte" => Some(Self::Lte),
            "$in" => Some(Self::In),
            _ => None,
        }
    }
}

/// One `field <op> value` test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Condition {
    pub fn matches(&self, item: &Item) -> bool {
        let id_value;
        let actual = if self.field == ID_FIELD {
            id_value = Value::String(item.id().to_string());
            Some(&id_value)
        } else {
            item.data.get(&self.field)
        };

        match self.op {
            CompareOp::Eq => actual == Some(&self.value),
            CompareOp::Ne => actual != Some(&self.value),
            CompareOp::In => match (&self.value, actual) {
                (Value::Array(options), Some(actual)) => options.contains(actual),
                _ => false,
            },
            CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => {
                let Some(ordering) = actual.and_then(|a| compare_scalars(a, &self.value)) else {
                    return false;
                };
                match self.op {
                    CompareOp::Gt => ordering == Ordering::Greater,
                    CompareOp::Gte => ordering != Ordering::Less,
                    CompareOp::Lt => ordering == Ordering::Less,
                    _ => ordering != Ordering::Greater,
                }
            }
        }
    }
}

/// Conjunction of conditions. An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.conditions.iter().all(|c| c.matches(item))
    }
}

/// Sort key with direction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    /// Parse `field` or `-field`.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                descending: true,
            },
            None => Self {
                field: raw.strip_prefix('+').unwrap_or(raw).to_string(),
                descending: false,
            },
        }
    }

    /// Order two items by this key, breaking ties by identifier.
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let by_field = if self.field == ID_FIELD {
            a.id().cmp(b.id())
        } else {
            total_order(a.data.get(&self.field), b.data.get(&self.field))
        };
        let ordering = if self.descending {
            by_field.reverse()
        } else {
            by_field
        };
        ordering.then_with(|| a.id().cmp(b.id()))
    }
}

/// Store-native list query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub page_size: usize,
    pub skip: usize,
}

fn compare_scalars(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

// Missing < null < bool < number < string < array < object.
fn rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

fn total_order(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Some(x), Some(y)) => compare_scalars(x, y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use triad_types::ItemId;

    fn item(id: &str, data: Value) -> Item {
        let Value::Object(map) = data else {
            panic!("object expected")
        };
        Item::new(ItemId::parse(id).unwrap(), map)
    }

    fn cond(field: &str, op: CompareOp, value: Value) -> Condition {
        Condition {
            field: field.into(),
            op,
            value,
        }
    }

    #[test]
    fn operators_parse() {
        assert_eq!(CompareOp::from_operator("$gte"), Some(CompareOp::Gte));
        assert_eq!(CompareOp::from_operator("$regex"), None);
    }

    #[test]
    fn equality_and_range() {
        let ada = item("ada", json!({"age": 36, "name": "Ada"}));
        assert!(cond("name", CompareOp::Eq, json!("Ada")).matches(&ada));
        assert!(cond("name", CompareOp::Ne, json!("Bob")).matches(&ada));
        assert!(cond("age", CompareOp::Gte, json!(36)).matches(&ada));
        assert!(!cond("age", CompareOp::Gt, json!(36)).matches(&ada));
        assert!(cond("age", CompareOp::Lt, json!(40.5)).matches(&ada));
        assert!(!cond("missing", CompareOp::Lt, json!(1)).matches(&ada));
        assert!(!cond("name", CompareOp::Gt, json!(1)).matches(&ada));
    }

    #[test]
    fn membership_and_id_field() {
        let ada = item("ada", json!({"role": "admin"}));
        assert!(cond("role", CompareOp::In, json!(["admin", "owner"])).matches(&ada));
        assert!(!cond("role", CompareOp::In, json!("admin")).matches(&ada));
        assert!(cond(ID_FIELD, CompareOp::Eq, json!("ada")).matches(&ada));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::all().matches(&item("x", json!({}))));
    }

    #[test]
    fn sort_parse_directions() {
        assert_eq!(
            Sort::parse("-age"),
            Sort {
                field: "age".into(),
                descending: true
            }
        );
        assert!(!Sort::parse("+age").descending);
        assert_eq!(Sort::parse("age").field, "age");
    }

    #[test]
    fn sort_orders_missing_first_and_ties_by_id() {
        let a = item("a", json!({"n": 2}));
        let b = item("b", json!({"n": 1}));
        let c = item("c", json!({}));
        let d = item("d", json!({"n": 1}));
        let mut items = vec![a, b, c, d];
        let sort = Sort::parse("n");
        items.sort_by(|x, y| sort.compare(x, y));
        let ids: Vec<&str> = items.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, ["c", "b", "d", "a"]);

        let sort = Sort::parse("-n");
        items.sort_by(|x, y| sort.compare(x, y));
        let ids: Vec<&str> = items.iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, ["a", "b", "d", "c"]);
    }
}
