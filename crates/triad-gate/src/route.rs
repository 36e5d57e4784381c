//! What a resolved path addresses and which operation a method selects.

use std::fmt;

use triad_types::{KeyTriple, TypeKey};

use crate::request::Method;

/// Fixed sub-resources of an item path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubResource {
    Data,
    Info,
    Acl,
    Append,
}

impl SubResource {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "data" => Some(Self::Data),
            "info" => Some(Self::Info),
            "acl" => Some(Self::Acl),
            "append" => Some(Self::Append),
            _ => None,
        }
    }
}

/// The storage entity a request path points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// `/:ns/:type`
    Type(TypeKey),
    /// `/:ns/:type/:item`
    Item(KeyTriple),
    /// `/:ns/:type/:item/{data,info,acl,append}`
    Sub(KeyTriple, SubResource),
}

impl Target {
    pub fn type_key(&self) -> TypeKey {
        match self {
            Self::Type(ty) => ty.clone(),
            Self::Item(key) | Self::Sub(key, _) => key.type_key(),
        }
    }

    /// The item key, for item-scoped targets.
    pub fn key(&self) -> Option<&KeyTriple> {
        match self {
            Self::Type(_) => None,
            Self::Item(key) | Self::Sub(key, _) => Some(key),
        }
    }
}

/// Operations exposed by the HTTP surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    RetrieveAll,
    RetrieveData,
    RetrieveInfo,
    RetrieveAcl,
    UpdateAcl,
    Update,
    Append,
    Delete,
}

impl Operation {
    /// Look up the operation for a method on a target. `None` means the
    /// combination has no handler.
    pub fn resolve(method: &Method, target: &Target) -> Option<Self> {
        use SubResource as S;
        match (target, method) {
            (Target::Type(_), Method::Get) => Some(Self::List),
            (Target::Type(_), Method::Post) => Some(Self::Create),
            (Target::Item(_), Method::Get) => Some(Self::RetrieveAll),
            (Target::Item(_), Method::Post) => Some(Self::Create),
            (Target::Item(_), Method::Put) => Some(Self::Update),
            (Target::Item(_), Method::Delete) => Some(Self::Delete),
            (Target::Sub(_, S::Data), Method::Get) => Some(Self::RetrieveData),
            (Target::Sub(_, S::Info), Method::Get) => Some(Self::RetrieveInfo),
            (Target::Sub(_, S::Acl), Method::Get) => Some(Self::RetrieveAcl),
            (Target::Sub(_, S::Acl), Method::Put) => Some(Self::UpdateAcl),
            (Target::Sub(_, S::Append), Method::Put) => Some(Self::Append),
            _ => None,
        }
    }

    /// Whether the operation changes stored state and so needs a session.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Self::Create | Self::Update | Self::Append | Self::UpdateAcl | Self::Delete
        )
    }

    /// Whether the operation reuses an item loaded by the resolver.
    pub fn needs_item(self) -> bool {
        matches!(self, Self::RetrieveAll | Self::RetrieveData | Self::RetrieveInfo)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Create => "create",
            Self::RetrieveAll => "retrieve-all",
            Self::RetrieveData => "retrieve-data",
            Self::RetrieveInfo => "retrieve-info",
            Self::RetrieveAcl => "retrieve-acl",
            Self::UpdateAcl => "update-acl",
            Self::Update => "update",
            Self::Append => "append",
            Self::Delete => "delete",
        })
    }
}
