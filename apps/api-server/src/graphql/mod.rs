//! GraphQL schema: queries, mutations, and subscriptions.

pub mod context;
pub mod guards;
pub mod mutation;
pub mod query;
pub mod subscription;
pub mod types;

use std::sync::Arc;

use async_graphql::{Context, Schema};
use uuid::Uuid;

use crate::error::invalid_input;
use crate::state::AppState;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use subscription::SubscriptionRoot;

/// The complete GraphQL schema type.
pub type AppSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Builds the GraphQL schema with the shared application state attached.
pub fn build_schema(state: Arc<AppState>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(state)
        .finish()
}

/// Looks up the shared application state from the GraphQL context.
pub(crate) fn state<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Arc<AppState>> {
    ctx.data::<Arc<AppState>>()
}

/// Parses an `ID` argument into a UUID.
pub(crate) fn parse_id(id: &async_graphql::ID, what: &str) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| invalid_input(format!("Invalid {what} id")))
}
