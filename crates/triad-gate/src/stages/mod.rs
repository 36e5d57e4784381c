//! Built-in pipeline stages, in the order the standard pipeline runs them.

pub mod addressing;
pub mod list;
pub mod mutation;
pub mod path;
pub mod resolver;
pub mod retrieve;
pub mod session;

pub use addressing::AddressingStage;
pub use list::ListStage;
pub use mutation::MutationStage;
pub use path::PathAuthorizationStage;
pub use resolver::ItemResolverStage;
pub use retrieve::RetrieveStage;
pub use session::SessionStage;
