use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::key::{ItemId, KeyTriple};

/// The payload half of an item: arbitrary JSON fields.
pub type Payload = Map<String, Value>;

/// Referenced items' current payloads, keyed by `<namespace>/<type>/<item>`.
///
/// Absent references map to `null`.
pub type RefCache = BTreeMap<String, Value>;

/// Key under which references are written inside a payload.
pub const REF_KEY: &str = "$ref";

/// Bookkeeping timestamps kept in the metadata envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl ItemInfo {
    /// Info for an item created right now.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created: now,
            updated: now,
        }
    }

    /// Mark the item as modified.
    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }
}

/// Metadata envelope serialized under `$`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    pub id: ItemId,
    pub info: ItemInfo,
    /// Request-scoped denormalization of referenced items. Never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<RefCache>,
}

/// A stored item: payload fields plus the `$` metadata envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "$")]
    pub meta: ItemMeta,
    #[serde(flatten)]
    pub data: Payload,
}

impl Item {
    /// A fresh item with new timestamps and no reference cache.
    pub fn new(id: ItemId, data: Payload) -> Self {
        Self {
            meta: ItemMeta {
                id,
                info: ItemInfo::now(),
                cache: None,
            },
            data,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.meta.id
    }

    pub fn info(&self) -> &ItemInfo {
        &self.meta.info
    }

    /// Every well-formed `{"$ref": "<ns>/<type>/<item>"}` found in the payload,
    /// in document order, without duplicates.
    pub fn references(&self) -> Vec<KeyTriple> {
        let mut found = Vec::new();
        for value in self.data.values() {
            collect_refs(value, &mut found);
        }
        found
    }
}

fn collect_refs(value: &Value, found: &mut Vec<KeyTriple>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(target)) = map.get(REF_KEY) {
                    if let Ok(key) = target.parse::<KeyTriple>() {
                        if !found.contains(&key) {
                            found.push(key);
                        }
                    }
                    return;
                }
            }
            for nested in map.values() {
                collect_refs(nested, found);
            }
        }
        Value::Array(items) => {
            for nested in items {
                collect_refs(nested, found);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn serializes_with_dollar_envelope() {
        let item = Item::new(ItemId::parse("a1").unwrap(), payload(json!({"name": "Ada"})));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["$"]["id"], "a1");
        assert!(value["$"]["info"]["created"].is_string());
        assert!(value["$"].get("cache").is_none());
    }

    #[test]
    fn deserializes_flattened_payload() {
        let value = json!({
            "$": {"id": "a1", "info": {"created": "2024-01-01T00:00:00Z", "updated": "2024-01-02T00:00:00Z"}},
            "name": "Ada",
            "tags": ["x"]
        });
        let item: Item = serde_json::from_value(value).unwrap();
        assert_eq!(item.id().as_str(), "a1");
        assert_eq!(item.data.len(), 2);
        assert_eq!(item.data["tags"], json!(["x"]));
    }

    #[test]
    fn finds_nested_references_once() {
        let item = Item::new(
            ItemId::parse("doc").unwrap(),
            payload(json!({
                "author": {"$ref": "core/user/ada"},
                "reviewers": [{"$ref": "core/user/bob"}, {"$ref": "core/user/ada"}],
                "broken": {"$ref": "not a key"},
                "notRef": {"$ref": "core/user/eve", "extra": 1}
            })),
        );
        let refs: Vec<String> = item.references().iter().map(ToString::to_string).collect();
        assert!(refs.contains(&"core/user/ada".to_string()));
        assert!(refs.contains(&"core/user/bob".to_string()));
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn touch_moves_updated_forward() {
        let mut info = ItemInfo::now();
        let created = info.created;
        info.touch();
        assert!(info.updated >= created);
        assert_eq!(info.created, created);
    }
}
