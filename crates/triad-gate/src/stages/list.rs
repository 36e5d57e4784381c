use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use triad_store::Store;
use triad_types::Page;

use crate::error::AccessError;
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::route::{Operation, Target};
use crate::stage::{Flow, Stage};
use crate::validate::Validator;

/// Answers list requests with a [`Page`].
///
/// Parameters are shape-checked before the store is consulted at all.
/// `has_next` comes from the number of items actually returned.
pub struct ListStage {
    store: Arc<dyn Store>,
    validator: Arc<dyn Validator>,
}

impl ListStage {
    pub fn new(store: Arc<dyn Store>, validator: Arc<dyn Validator>) -> Self {
        Self { store, validator }
    }
}

#[async_trait]
impl Stage for ListStage {
    fn name(&self) -> &str {
        "list"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError> {
        if ctx.operation != Some(Operation::List) {
            return Ok(Flow::Continue);
        }
        let Some(Target::Type(ty)) = &ctx.target else {
            return Err(AccessError::Internal("list requires a type-scoped target".into()));
        };

        let params = self.validator.list_params(&ctx.query)?;
        let query = self.store.build_list_query(ty, &params).await?;
        let items = self.store.list(ty, &query).await?;
        let total = self.store.count(ty, &query.filter).await?;

        debug!(ty = %ty, returned = items.len(), total, "listed");
        let page = Page::new(items, total, query.page_size, query.skip);
        Ok(Flow::Respond(Reply::json(&page)?))
    }
}
