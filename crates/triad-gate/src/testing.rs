//! Test doubles shared by the pipeline tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use triad_store::{Filter, InMemoryStore, ListParams, ListQuery, Store, StoreResult};
use triad_types::{Acl, Identity, Item, ItemId, KeyTriple, Payload, RefCache, Session, TypeKey};

use crate::config::AccessConfig;
use crate::pipeline::Pipeline;
use crate::validate::DefaultValidator;

/// An [`InMemoryStore`] that remembers which operations were called.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryStore,
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, op: &'static str) {
        self.calls.lock().unwrap().push(op);
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn get(&self, key: &KeyTriple) -> StoreResult<Option<Item>> {
        self.record("get");
        self.inner.get(key).await
    }

    async fn get_acl(&self, key: &KeyTriple) -> StoreResult<Acl> {
        self.record("get_acl");
        self.inner.get_acl(key).await
    }

    async fn modify_acl(&self, key: &KeyTriple, acl: Acl) -> StoreResult<()> {
        self.record("modify_acl");
        self.inner.modify_acl(key, acl).await
    }

    async fn cache_refs(&self, item: &Item) -> StoreResult<RefCache> {
        self.record("cache_refs");
        self.inner.cache_refs(item).await
    }

    async fn build_list_query(&self, ty: &TypeKey, params: &ListParams) -> StoreResult<ListQuery> {
        self.record("build_list_query");
        self.inner.build_list_query(ty, params).await
    }

    async fn list(&self, ty: &TypeKey, query: &ListQuery) -> StoreResult<Vec<Item>> {
        self.record("list");
        self.inner.list(ty, query).await
    }

    async fn count(&self, ty: &TypeKey, filter: &Filter) -> StoreResult<u64> {
        self.record("count");
        self.inner.count(ty, filter).await
    }

    async fn create(&self, ty: &TypeKey, id: Option<ItemId>, body: Payload) -> StoreResult<Item> {
        self.record("create");
        self.inner.create(ty, id, body).await
    }

    async fn update(&self, key: &KeyTriple, body: Payload) -> StoreResult<()> {
        self.record("update");
        self.inner.update(key, body).await
    }

    async fn append(&self, key: &KeyTriple, body: Payload) -> StoreResult<()> {
        self.record("append");
        self.inner.append(key, body).await
    }

    async fn delete(&self, key: &KeyTriple) -> StoreResult<()> {
        self.record("delete");
        self.inner.delete(key).await
    }
}

/// The standard pipeline over a recording store and the default path table.
pub fn standard_pipeline() -> (Pipeline, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::new());
    let rules = Arc::new(AccessConfig::default().rules().unwrap());
    let pipeline = Pipeline::standard(store.clone(), rules, Arc::new(DefaultValidator));
    (pipeline, store)
}

pub fn ada() -> Session {
    Session::Authenticated(Identity::user("ada"))
}
