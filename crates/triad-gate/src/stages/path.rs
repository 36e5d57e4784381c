use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AccessError;
use crate::request::RequestContext;
use crate::rules::PathRules;
use crate::stage::{Flow, Stage};

/// Static path authorization.
///
/// Runs first, before any key parsing or store access, so restricted and
/// read-only prefixes hold regardless of session state or item existence.
pub struct PathAuthorizationStage {
    rules: Arc<PathRules>,
}

impl PathAuthorizationStage {
    pub fn new(rules: Arc<PathRules>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl Stage for PathAuthorizationStage {
    fn name(&self) -> &str {
        "path-authorization"
    }

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError> {
        let class = self.rules.classify(&ctx.segments);
        ctx.classification = class;

        if class.admits(&ctx.method) {
            return Ok(Flow::Continue);
        }
        debug!(path = %ctx.path, method = %ctx.method, class = %class, "path rejected");
        Err(AccessError::restricted())
    }
}
