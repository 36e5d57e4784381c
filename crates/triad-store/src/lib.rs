//! Store collaborator contract for triad.
//!
//! The access layer never persists anything itself. It talks to a [`Store`]
//! for every lookup, listing and mutation, and forwards [`StoreError`]s to
//! the caller unchanged.
//!
//! # Backends
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Items and ACLs are separate records keyed by the same key triple.
//! 2. Client filter syntax is translated by the store, not by the caller.
//! 3. Identifier assignment on create is owned by the store.
//! 4. Append semantics are backend-defined.

pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, ListLimits};
pub use query::{CompareOp, Condition, Filter, ListParams, ListQuery, Sort, ID_FIELD};
pub use traits::Store;
