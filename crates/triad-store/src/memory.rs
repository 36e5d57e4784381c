//! In-memory store for tests, demos and single-process deployments.
//!
//! [`InMemoryStore`] keeps items per type in ordered maps and ACLs in a
//! separate map, each behind a `RwLock`. Data is lost when the store is
//! dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use triad_types::{Acl, Item, ItemId, KeyTriple, Payload, RefCache, TypeKey};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::query::{CompareOp, Condition, Filter, ListParams, ListQuery, Sort};
use crate::traits::Store;

/// Paging defaults applied when normalizing list queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

type Bucket = BTreeMap<ItemId, Item>;

/// An in-memory implementation of [`Store`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<HashMap<TypeKey, Bucket>>,
    acls: RwLock<HashMap<KeyTriple, Acl>>,
    limits: ListLimits,
}

fn poisoned(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("lock poisoned: {e}"))
}

/// The envelope key is reserved; a client cannot smuggle metadata in.
fn strip_envelope(mut body: Payload) -> Payload {
    body.remove("$");
    body
}

/// Array + array concatenates, array + scalar pushes, object + object merges
/// shallowly, anything else replaces.
fn merge_into(target: &mut Payload, body: Payload) {
    for (field, incoming) in body {
        let Some(slot) = target.get_mut(&field) else {
            target.insert(field, incoming);
            continue;
        };
        match (slot, incoming) {
            (Value::Array(existing), Value::Array(more)) => existing.extend(more),
            (Value::Array(existing), scalar) => existing.push(scalar),
            (Value::Object(existing), Value::Object(more)) => existing.extend(more),
            (slot, incoming) => *slot = incoming,
        }
    }
}

impl InMemoryStore {
    /// Create an empty store with default paging limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given paging limits.
    pub fn with_limits(limits: ListLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Total number of items across all types.
    pub fn len(&self) -> StoreResult<usize> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.values().map(BTreeMap::len).sum())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn translate_filter(raw: &serde_json::Map<String, Value>) -> StoreResult<Filter> {
        let mut conditions = Vec::new();
        for (field, criterion) in raw {
            match criterion {
                Value::Object(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
                    for (name, value) in ops {
                        let op = CompareOp::from_operator(name).ok_or_else(|| {
                            StoreError::InvalidQuery(format!(
                                "unknown operator {name:?} on field {field:?}"
                            ))
                        })?;
                        if op == CompareOp::In && !value.is_array() {
                            return Err(StoreError::InvalidQuery(format!(
                                "$in on field {field:?} expects an array"
                            )));
                        }
                        conditions.push(Condition {
                            field: field.clone(),
                            op,
                            value: value.clone(),
                        });
                    }
                }
                other => conditions.push(Condition {
                    field: field.clone(),
                    op: CompareOp::Eq,
                    value: other.clone(),
                }),
            }
        }
        Ok(Filter { conditions })
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get(&self, key: &KeyTriple) -> StoreResult<Option<Item>> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items
            .get(&key.type_key())
            .and_then(|bucket| bucket.get(&key.item_id))
            .cloned())
    }

    async fn get_acl(&self, key: &KeyTriple) -> StoreResult<Acl> {
        let acls = self.acls.read().map_err(poisoned)?;
        Ok(acls.get(key).cloned().unwrap_or_default())
    }

    async fn modify_acl(&self, key: &KeyTriple, acl: Acl) -> StoreResult<()> {
        let mut acls = self.acls.write().map_err(poisoned)?;
        acls.insert(key.clone(), acl);
        debug!(key = %key, "acl replaced");
        Ok(())
    }

    async fn cache_refs(&self, item: &Item) -> StoreResult<RefCache> {
        let items = self.items.read().map_err(poisoned)?;
        let cache = item
            .references()
            .into_iter()
            .map(|key| {
                let resolved = items
                    .get(&key.type_key())
                    .and_then(|bucket| bucket.get(&key.item_id))
                    .map_or(Value::Null, |target| Value::Object(target.data.clone()));
                (key.to_string(), resolved)
            })
            .collect();
        Ok(cache)
    }

    async fn build_list_query(&self, _ty: &TypeKey, params: &ListParams) -> StoreResult<ListQuery> {
        let filter = match &params.filter {
            Some(raw) => Self::translate_filter(raw)?,
            None => Filter::all(),
        };
        let page_size = params
            .page_size
            .unwrap_or(self.limits.default_page_size)
            .min(self.limits.max_page_size)
            .max(1);
        Ok(ListQuery {
            filter,
            sort: params.sort.as_deref().map(Sort::parse),
            page_size,
            skip: params.skip.unwrap_or(0),
        })
    }

    async fn list(&self, ty: &TypeKey, query: &ListQuery) -> StoreResult<Vec<Item>> {
        let items = self.items.read().map_err(poisoned)?;
        let Some(bucket) = items.get(ty) else {
            return Ok(Vec::new());
        };
        let mut matched: Vec<&Item> = bucket
            .values()
            .filter(|item| query.filter.matches(item))
            .collect();
        if let Some(sort) = &query.sort {
            matched.sort_by(|a, b| sort.compare(a, b));
        }
        Ok(matched
            .into_iter()
            .skip(query.skip)
            .take(query.page_size)
            .cloned()
            .collect())
    }

    async fn count(&self, ty: &TypeKey, filter: &Filter) -> StoreResult<u64> {
        let items = self.items.read().map_err(poisoned)?;
        let count = items
            .get(ty)
            .map_or(0, |bucket| bucket.values().filter(|item| filter.matches(item)).count());
        Ok(count as u64)
    }

    async fn create(&self, ty: &TypeKey, id: Option<ItemId>, body: Payload) -> StoreResult<Item> {
        let id = match id {
            Some(id) => id,
            None => ItemId::parse(Uuid::now_v7().to_string())
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        };

        let mut items = self.items.write().map_err(poisoned)?;
        let bucket = items.entry(ty.clone()).or_default();
        if bucket.contains_key(&id) {
            return Err(StoreError::AlreadyExists(ty.item(id).to_string()));
        }

        let item = Item::new(id.clone(), strip_envelope(body));
        bucket.insert(id, item.clone());
        debug!(ty = %ty, id = %item.id(), "item created");
        Ok(item)
    }

    async fn update(&self, key: &KeyTriple, body: Payload) -> StoreResult<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        let item = items
            .get_mut(&key.type_key())
            .and_then(|bucket| bucket.get_mut(&key.item_id))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        item.data = strip_envelope(body);
        item.meta.info.touch();
        Ok(())
    }

    async fn append(&self, key: &KeyTriple, body: Payload) -> StoreResult<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        let item = items
            .get_mut(&key.type_key())
            .and_then(|bucket| bucket.get_mut(&key.item_id))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        merge_into(&mut item.data, strip_envelope(body));
        item.meta.info.touch();
        Ok(())
    }

    async fn delete(&self, key: &KeyTriple) -> StoreResult<()> {
        let mut items = self.items.write().map_err(poisoned)?;
        let removed = items
            .get_mut(&key.type_key())
            .and_then(|bucket| bucket.remove(&key.item_id));
        if removed.is_none() {
            return Err(StoreError::NotFound(key.to_string()));
        }
        drop(items);

        self.acls.write().map_err(poisoned)?.remove(key);
        debug!(key = %key, "item deleted");
        Ok(())
    }
}
