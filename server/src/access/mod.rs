//! Access control.
//!
//! Access control is stateless. The server validates the JWT against the
//! configured key and identifies the requester by the `sub` claim. There
//! are no roles: what a requester may do with a collection depends only
//! on the visibility of the revision and on who owns it.
//!
//! - Anyone, including anonymous clients, may view a PUBLIC revision.
//! - Only the owner may view a PRIVATE revision.
//! - Only the owner may mutate a collection or its datasets, regardless
//!   of visibility.
//!
//! ## Discovery
//!
//! Whether a PRIVATE collection or a dataset exists is not revealed to
//! clients who may not see it. Endpoints that operate on such resources
//! return the same Forbidden response for a missing resource as for a
//! resource the requester has no access to.

pub mod http;

#[cfg(test)]
mod tests;

use displaydoc::Display;

use crate::database::entity::collection::CollectionModel;
use crate::error::ServerResult;
use portal::collection::Visibility;

macro_rules! require_permission_function {
    ($name:ident, $descr:literal, $member:ident) => {
        pub fn $name(&self) -> ServerResult<()> {
            if !self.$member {
                tracing::debug!("Client has no {} permission", $descr);
                Err(Error::PermissionDenied.into())
            } else {
                Ok(())
            }
        }
    };
}

/// Permission of a requester to a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionPermission {
    /// Can view the collection and its datasets.
    pub view: bool,

    /// Can modify the collection and its datasets.
    pub mutate: bool,
}

/// An access error.
#[derive(Debug, Display)]
pub enum Error {
    /// User does not have permission to complete this action.
    PermissionDenied,
}

/// Returns whether a requester may view a collection revision.
pub fn can_view(collection: &CollectionModel, requester: Option<&str>) -> bool {
    match collection.visibility() {
        Ok(Visibility::Public) => true,
        Ok(Visibility::Private) => is_owner(collection, requester),
        Err(e) => {
            tracing::warn!("Collection {} has {}", collection.id, e);
            false
        }
    }
}

/// Returns whether a requester may modify a collection revision.
pub fn can_mutate(collection: &CollectionModel, requester: Option<&str>) -> bool {
    is_owner(collection, requester)
}

fn is_owner(collection: &CollectionModel, requester: Option<&str>) -> bool {
    matches!(requester, Some(user) if user == collection.owner)
}

impl CollectionPermission {
    /// Computes the permission of a requester to a collection revision.
    pub fn for_requester(collection: &CollectionModel, requester: Option<&str>) -> Self {
        Self {
            view: can_view(collection, requester),
            mutate: can_mutate(collection, requester),
        }
    }

    require_permission_function!(require_view, "view", view);
    require_permission_function!(require_mutate, "mutate", mutate);
}

impl std::error::Error for Error {}
