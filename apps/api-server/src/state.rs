//! Application state.

use std::sync::Arc;

use auth::JwtManager;
use doc_store::DocumentStore;

use crate::config::Config;
use crate::events::EventBus;

/// Shared application state.
///
/// The store is held as a trait object because the GraphQL context is
/// type-keyed: resolvers look the state up by a single concrete type.
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Document store.
    pub store: Arc<dyn DocumentStore>,
    /// JWT manager.
    pub jwt_manager: JwtManager,
    /// In-process event bus for subscription fan-out.
    pub events: EventBus,
}

impl AppState {
    /// Creates new application state.
    pub fn new(config: Config, store: Arc<dyn DocumentStore>, jwt_manager: JwtManager) -> Self {
        Self {
            config,
            store,
            jwt_manager,
            events: EventBus::new(),
        }
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<AppState>;
