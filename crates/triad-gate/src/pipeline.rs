use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use triad_store::Store;

use crate::error::{AccessError, AccessResult};
use crate::reply::Reply;
use crate::request::RequestContext;
use crate::rules::PathRules;
use crate::stage::{Flow, Stage, StageOutcome, StageRecord};
use crate::stages::{
    AddressingStage, ItemResolverStage, ListStage, MutationStage, PathAuthorizationStage,
    RetrieveStage, SessionStage,
};
use crate::validate::Validator;

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// An ordered chain of stages that every request runs through.
///
/// The chain is **fail-fast**: the first stage that answers or fails ends
/// the request. A request that no stage answers has no route.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    ///
    /// Use [`Self::add_stage`] to add stages, or [`Self::standard`] for the
    /// full access layer.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard chain:
    /// path authorization -> addressing -> item resolver -> retrieve -> list
    /// -> session -> mutation
    pub fn standard(
        store: Arc<dyn Store>,
        rules: Arc<PathRules>,
        validator: Arc<dyn Validator>,
    ) -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(Box::new(PathAuthorizationStage::new(rules.clone())));
        pipeline.add_stage(Box::new(AddressingStage::new(validator.clone())));
        pipeline.add_stage(Box::new(ItemResolverStage::new(store.clone())));
        pipeline.add_stage(Box::new(RetrieveStage::new(store.clone(), rules)));
        pipeline.add_stage(Box::new(ListStage::new(store.clone(), validator)));
        pipeline.add_stage(Box::new(SessionStage));
        pipeline.add_stage(Box::new(MutationStage::new(store)));
        pipeline
    }

    /// Append a stage to the end of the chain.
    pub fn add_stage(&mut self, stage: Box<dyn Stage>) {
        self.stages.push(stage);
    }

    /// Number of stages in the chain.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run the chain and return the reply, or the error that ended it.
    pub async fn run(&self, ctx: &mut RequestContext) -> AccessResult<Reply> {
        for stage in &self.stages {
            let started = Instant::now();
            let result = stage.run(ctx).await;

            let outcome = match &result {
                Ok(Flow::Continue) => StageOutcome::Continued,
                Ok(Flow::Respond(reply)) => StageOutcome::Responded(reply.status),
                Err(err) => StageOutcome::Failed(err.to_string()),
            };
            ctx.trail.push(StageRecord {
                stage: stage.name().to_string(),
                outcome,
                elapsed: started.elapsed(),
            });

            if let Flow::Respond(reply) = result? {
                return Ok(reply);
            }
        }

        Err(AccessError::NotFound(format!(
            "No route for {} {}",
            ctx.method, ctx.path
        )))
    }

    /// Run the chain, turning any error into the uniform failure reply.
    pub async fn handle(&self, ctx: &mut RequestContext) -> Reply {
        let started = Instant::now();
        let reply = match self.run(ctx).await {
            Ok(reply) => reply,
            Err(err) => {
                if matches!(err, AccessError::Store(_)) || err.status() >= 500 {
                    warn!(method = %ctx.method, path = %ctx.path, error = %err, "request failed");
                }
                Reply::from_error(&err)
            }
        };

        info!(
            method = %ctx.method,
            path = %ctx.path,
            operation = ?ctx.operation,
            status = reply.status,
            stages = ctx.trail.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "request handled"
        );
        reply
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
