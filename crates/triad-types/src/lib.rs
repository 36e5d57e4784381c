//! Foundation types for triad.
//!
//! Every item is addressed by a key triple and carried as a JSON payload
//! with a `$` metadata envelope. Every other triad crate depends on
//! `triad-types`.
//!
//! # Key Types
//!
//! - [`Namespace`], [`TypeId`], [`ItemId`] -- validated path segments
//! - [`KeyTriple`] / [`TypeKey`] -- item and type addresses
//! - [`Item`] -- payload plus [`ItemMeta`] envelope
//! - [`Acl`] -- opaque per-item access control list
//! - [`Page`] -- paginated list result
//! - [`Session`] -- authentication state of a request

pub mod acl;
pub mod error;
pub mod identity;
pub mod item;
pub mod key;
pub mod page;

pub use acl::Acl;
pub use error::TypeError;
pub use identity::{Identity, Session};
pub use item::{Item, ItemInfo, ItemMeta, Payload, RefCache, REF_KEY};
pub use key::{ItemId, KeyTriple, Namespace, TypeId, TypeKey};
pub use page::Page;
