use std::time::Duration;

use async_trait::async_trait;

use crate::error::AccessError;
use crate::reply::Reply;
use crate::request::RequestContext;

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// What a stage decided.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Hand the request to the next stage.
    Continue,
    /// Stop here and send this reply.
    Respond(Reply),
}

// ---------------------------------------------------------------------------
// StageRecord
// ---------------------------------------------------------------------------

/// How a single stage ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    Continued,
    Responded(u16),
    Failed(String),
}

/// Recorded result from a completed stage.
#[derive(Clone, Debug)]
pub struct StageRecord {
    /// Name of the stage that produced this record.
    pub stage: String,
    pub outcome: StageOutcome,
    /// Wall-clock time the stage took.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Stage trait
// ---------------------------------------------------------------------------

/// A single step in the request pipeline.
///
/// Stages run in order against one mutable [`RequestContext`]. Each either
/// lets the request continue, answers it, or fails it; the first answer or
/// failure ends the request.
///
/// The trait is object-safe and `Send + Sync` so stages can be stored in
/// a `Vec<Box<dyn Stage>>`.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Human-readable name of this stage (e.g., "path-authorization").
    fn name(&self) -> &str;

    async fn run(&self, ctx: &mut RequestContext) -> Result<Flow, AccessError>;
}
