//! Resolver authorization guards.

use async_graphql::{Context, ErrorExtensions};
use entities::User;

use crate::error::{forbidden, ApiError};
use crate::graphql::context::Session;

/// Returns the authenticated user from the request session.
///
/// Fails `Unauthenticated` for anonymous callers or when no session was
/// attached at all.
pub fn current_user<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a User> {
    ctx.data_opt::<Session>()
        .and_then(|session| session.user.as_ref())
        .ok_or_else(|| ApiError::Unauthenticated.extend())
}

/// Asserts that the given user has the admin role.
pub fn require_admin(user: &User) -> async_graphql::Result<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(forbidden("Not authorized. Admin access required"))
    }
}
