use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use triad_store::Store;

use crate::error::AccessError;
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::route::Operation;
use crate::rules::{Classification, PathRules};
use crate::stage::{Flow, Stage};

/// Answers retrieve-all, retrieve-data, retrieve-info and retrieve-acl.
///
/// The first three reuse the item on the context. Retrieve-all attaches a
/// freshly built reference cache first; retrieve-data drops the envelope;
/// retrieve-info returns only the info block. Retrieve-acl does its own
/// lookup and does not depend on the item existing.
///
/// References into restricted prefixes resolve to `null` in the cache.
pub struct RetrieveStage {
    store: Arc<dyn Store>,
    rules: Arc<PathRules>,
}

impl RetrieveStage {
    pub fn new(store: Arc<dyn Store>, rules: Arc<PathRules>) -> Self {
        Self { store, rules }
    }
}

#[async_trait]
impl Stage for RetrieveStage {
    fn name(&self) -> &str {
        "retrieve"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError> {
        let reply = match ctx.operation {
            Some(Operation::RetrieveAll) => {
                let item = ctx.resolved_item_mut()?;
                let mut cache = self.store.cache_refs(item).await?;
                for (key, value) in cache.iter_mut() {
                    if self.rules.classify_path(key) == Classification::Restricted {
                        debug!(reference = %key, "restricted reference withheld");
                        *value = Value::Null;
                    }
                }
                item.meta.cache = Some(cache);
                Reply::json(&*item)?
            }
            Some(Operation::RetrieveData) => Reply::json(&ctx.resolved_item_mut()?.data)?,
            Some(Operation::RetrieveInfo) => Reply::json(ctx.resolved_item_mut()?.info())?,
            Some(Operation::RetrieveAcl) => {
                let acl = self.store.get_acl(ctx.key()?).await?;
                Reply::json(&acl)?
            }
            _ => return Ok(Flow::Continue),
        };
        Ok(Flow::Respond(reply))
    }
}
