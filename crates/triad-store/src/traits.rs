use async_trait::async_trait;
use triad_types::{Acl, Item, ItemId, KeyTriple, Payload, RefCache, TypeKey};

use crate::error::StoreResult;
use crate::query::{Filter, ListParams, ListQuery};

/// The persistence collaborator behind the access layer.
///
/// All implementations must satisfy these invariants:
/// - Operations on a single key are atomic.
/// - `list` and `count` are independent reads. A write landing between
///   them can leave `skip + items.len()` above `total`; callers must not
///   assume otherwise.
/// - Items and ACLs are separate records: reading or writing one never
///   requires the other to exist.
/// - Failures are returned, never retried; the access layer forwards them
///   to the caller as-is.
#[async_trait]
pub trait Store: Send + Sync {
    /// Load an item by key. Returns `Ok(None)` if it does not exist.
    async fn get(&self, key: &KeyTriple) -> StoreResult<Option<Item>>;

    /// Read the ACL for a key.
    async fn get_acl(&self, key: &KeyTriple) -> StoreResult<Acl>;

    /// Replace the ACL for a key.
    async fn modify_acl(&self, key: &KeyTriple, acl: Acl) -> StoreResult<()>;

    /// Resolve the current state of everything the item references.
    async fn cache_refs(&self, item: &Item) -> StoreResult<RefCache>;

    /// Translate client list parameters into a store-native query with
    /// normalized paging.
    async fn build_list_query(&self, ty: &TypeKey, params: &ListParams) -> StoreResult<ListQuery>;

    /// One page of items matching the query.
    async fn list(&self, ty: &TypeKey, query: &ListQuery) -> StoreResult<Vec<Item>>;

    /// Number of items matching the filter, ignoring paging. Not taken
    /// from the same snapshot as a preceding [`Store::list`].
    async fn count(&self, ty: &TypeKey, filter: &Filter) -> StoreResult<u64>;

    /// Create an item. With `id == None` the store assigns the identifier.
    async fn create(&self, ty: &TypeKey, id: Option<ItemId>, body: Payload) -> StoreResult<Item>;

    /// Replace an item's payload.
    async fn update(&self, key: &KeyTriple, body: Payload) -> StoreResult<()>;

    /// Incrementally merge into an item's payload. The merge strategy is the
    /// store's own.
    async fn append(&self, key: &KeyTriple, body: Payload) -> StoreResult<()>;

    /// Remove an item.
    async fn delete(&self, key: &KeyTriple) -> StoreResult<()>;
}
