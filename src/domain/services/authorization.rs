//! Ownership rules shared by every handler that mutates or consumes a resource.

use crate::domain::models::{auth::Caller, event::Event, review::Review};
use crate::error::AppError;

/// What the caller is trying to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Owner or admin: edit/delete events, create/update their ticket types.
    Manage,
    /// Anyone except the owner and admins: buy tickets, write reviews.
    Consume,
    /// Owner only, admins included in the restriction: edit/delete own reviews.
    Author,
}

pub trait Resource {
    const KIND: &'static str;

    fn owner_id(&self) -> &str;
}

impl Resource for Event {
    const KIND: &'static str = "event";

    fn owner_id(&self) -> &str {
        &self.organizer_id
    }
}

impl Resource for Review {
    const KIND: &'static str = "review";

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

pub fn is_permitted<R: Resource>(caller: &Caller, resource: &R, access: Access) -> bool {
    let is_owner = caller.id == resource.owner_id();
    match access {
        Access::Manage => is_owner || caller.is_admin(),
        Access::Consume => !is_owner && !caller.is_admin(),
        Access::Author => is_owner,
    }
}

pub fn authorize<R: Resource>(caller: &Caller, resource: &R, access: Access) -> Result<(), AppError> {
    if is_permitted(caller, resource, access) {
        return Ok(());
    }

    let message = match access {
        Access::Manage => format!(
            "Access denied. Only the {} owner or an admin can perform this action.",
            R::KIND
        ),
        Access::Consume => format!(
            "Access denied. Organizers and admins cannot do this on their own {}.",
            R::KIND
        ),
        Access::Author => format!("Access denied. Only the author can modify this {}.", R::KIND),
    };
    Err(AppError::Forbidden(message))
}
