//! Request pipeline for triad.
//!
//! Every request runs through an ordered chain of stages before anything is
//! returned to the caller. The chain checks the static path table, parses
//! and validates the key triple, loads the addressed item for retrievals,
//! answers reads, demands a session for everything else, and finally
//! performs the mutation. The first stage that answers or fails ends the
//! request.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use triad_gate::{AccessConfig, DefaultValidator, Method, Pipeline, RequestContext};
//! use triad_store::InMemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(InMemoryStore::new());
//! let rules = Arc::new(AccessConfig::default().rules().unwrap());
//! let pipeline = Pipeline::standard(store, rules, Arc::new(DefaultValidator));
//!
//! let mut ctx = RequestContext::new(Method::Get, "/core/user_private/ada");
//! let reply = pipeline.handle(&mut ctx).await;
//! assert_eq!(reply.status, 401);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod reply;
pub mod request;
pub mod route;
pub mod rules;
pub mod stage;
pub mod stages;
pub mod validate;

#[cfg(test)]
mod testing;

// Re-exports for convenience.
pub use config::AccessConfig;
pub use error::{AccessError, AccessResult, LOGIN_REQUIRED_MESSAGE, RESTRICTED_MESSAGE};
pub use pipeline::Pipeline;
pub use reply::{Reply, SUCCESS};
pub use request::{Method, RawQuery, RequestBody, RequestContext};
pub use route::{Operation, SubResource, Target};
pub use rules::{Classification, PathRules};
pub use stage::{Flow, Stage, StageOutcome, StageRecord};
pub use stages::{
    AddressingStage, ItemResolverStage, ListStage, MutationStage, PathAuthorizationStage,
    RetrieveStage, SessionStage,
};
pub use validate::{DefaultValidator, Validator};
