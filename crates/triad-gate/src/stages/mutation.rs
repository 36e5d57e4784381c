use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;
use triad_store::Store;
use triad_types::Acl;

use crate::error::AccessError;
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::route::{Operation, Target};
use crate::stage::{Flow, Stage};

/// Create, update, append, update-acl and delete.
///
/// Only reached once the session stage has passed. Bodies are validated
/// here, after authentication. Create answers with the new identifier;
/// everything else with a plain acknowledgment.
pub struct MutationStage {
    store: Arc<dyn Store>,
}

impl MutationStage {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Stage for MutationStage {
    fn name(&self) -> &str {
        "mutation"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError> {
        let Some(op) = ctx.operation.filter(|op| op.is_mutating()) else {
            return Ok(Flow::Continue);
        };
        let user = ctx.session.identity().map(|i| i.name.clone()).unwrap_or_default();

        let reply = match op {
            Operation::Create => {
                let (ty, proposed) = match &ctx.target {
                    Some(Target::Type(ty)) => (ty.clone(), None),
                    Some(Target::Item(key)) => (key.type_key(), Some(key.item_id.clone())),
                    _ => return Err(AccessError::Internal("create requires a type or item target".into())),
                };
                let body = ctx.body.object_or_empty()?;
                let item = self.store.create(&ty, proposed, body).await?;
                info!(ty = %ty, id = %item.id(), user = %user, "created");
                Reply::json(item.id())?
            }
            Operation::Update => {
                let body = ctx.body.object()?;
                self.store.update(ctx.key()?, body).await?;
                Reply::success()
            }
            Operation::Append => {
                let body = ctx.body.object()?;
                self.store.append(ctx.key()?, body).await?;
                Reply::success()
            }
            Operation::UpdateAcl => {
                let body = ctx.body.object()?;
                self.store.modify_acl(ctx.key()?, Acl(Value::Object(body))).await?;
                Reply::success()
            }
            Operation::Delete => {
                self.store.delete(ctx.key()?).await?;
                Reply::success()
            }
            _ => return Ok(Flow::Continue),
        };

        if op != Operation::Create {
            info!(op = %op, target = %ctx.key()?, user = %user, "mutated");
        }
        Ok(Flow::Respond(reply))
    }
}
