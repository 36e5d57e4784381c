use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use triad_store::Store;

use crate::error::AccessError;
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::stage::{Flow, Stage};

/// Loads the addressed item once for the retrieval handlers that reuse it.
///
/// A missing item is answered here with a structured 404; nothing after
/// this stage runs for that request.
pub struct ItemResolverStage {
    store: Arc<dyn Store>,
}

impl ItemResolverStage {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Stage for ItemResolverStage {
    fn name(&self) -> &str {
        "item-resolver"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError> {
        if !ctx.operation.is_some_and(|op| op.needs_item()) {
            return Ok(Flow::Continue);
        }

        let key = ctx.key()?.clone();
        match self.store.get(&key).await? {
            Some(item) => {
                ctx.item = Some(item);
                Ok(Flow::Continue)
            }
            None => {
                debug!(key = %key, "item not found");
                Ok(Flow::Respond(Reply::not_found(format!("Item {key} not found"))))
            }
        }
    }
}
