use crate::auth::Actor;
use crate::types::{Resource, Role};

use super::error::BulkError;

pub const ADMIN_REQUIRED: &str = "Admin access required";
pub const FORBIDDEN: &str = "Forbidden";

/// Endpoint-level role gate, checked before the body is parsed.
///
/// Categories and shops are admin-only. Orders, auctions and products take
/// admins and sellers. Reviews take any signed-in non-guest.
pub fn admit(resource: Resource, actor: &Actor) -> Result<(), BulkError> {
    match (resource, actor.role) {
        (Resource::Categories | Resource::Shops, Role::Admin) => Ok(()),
        (Resource::Categories | Resource::Shops, _) => Err(BulkError::Forbidden(ADMIN_REQUIRED.to_string())),
        (Resource::Orders | Resource::Auctions | Resource::Products, Role::Admin | Role::Seller) => Ok(()),
        (Resource::Reviews, Role::Admin | Role::Seller | Role::User) => Ok(()),
        _ => Err(BulkError::Forbidden(FORBIDDEN.to_string())),
    }
}

/// `admit` plus the per-action rule for reviews: only admins may do
/// anything other than `flag`
pub fn authorize(resource: Resource, actor: &Actor, action: &str) -> Result<(), BulkError> {
    admit(resource, actor)?;
    if resource == Resource::Reviews && !actor.is_admin() && action != "flag" {
        return Err(BulkError::Forbidden(ADMIN_REQUIRED.to_string()));
    }
    Ok(())
}

/// Sellers act only on records belonging to their own shops
pub fn requires_ownership(actor: &Actor) -> bool {
    actor.role == Role::Seller
}
