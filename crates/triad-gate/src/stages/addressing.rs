use std::sync::Arc;

use async_trait::async_trait;
use triad_types::TypeKey;

use crate::error::AccessError;
use crate::request::RequestContext;
use crate::route::{Operation, SubResource, Target};
use crate::stage::{Flow, Stage};
use crate::validate::Validator;

/// Parses path segments into a [`Target`] and picks the [`Operation`].
///
/// Any path with two or more segments has its namespace and type validated;
/// any path with three or more also has its item id validated, whether or
/// not the rest of the path matches a route. Paths that match no route
/// leave `ctx.operation` empty.
pub struct AddressingStage {
    validator: Arc<dyn Validator>,
}

impl AddressingStage {
    pub fn new(validator: Arc<dyn Validator>) -> Self {
        Self { validator }
    }

    fn resolve(&self, segments: &[String]) -> Result<Option<Target>, AccessError> {
        let [namespace, type_id, rest @ ..] = segments else {
            return Ok(None);
        };
        let ty = TypeKey::new(
            self.validator.namespace(namespace)?,
            self.validator.type_id(type_id)?,
        );

        let Some((item_id, rest)) = rest.split_first() else {
            return Ok(Some(Target::Type(ty)));
        };
        let key = ty.item(self.validator.item_id(item_id)?);

        Ok(match rest {
            [] => Some(Target::Item(key)),
            [sub] => SubResource::parse(sub).map(|sub| Target::Sub(key, sub)),
            _ => None,
        })
    }
}

#[async_trait]
impl Stage for AddressingStage {
    fn name(&self) -> &str {
        "addressing"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError> {
        let target = self.resolve(&ctx.segments)?;
        ctx.operation = target
            .as_ref()
            .and_then(|target| Operation::resolve(&ctx.method, target));
        ctx.target = target;
        Ok(Flow::Continue)
    }
}
