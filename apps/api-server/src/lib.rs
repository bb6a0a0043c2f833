//! StudyTrack API Server
//!
//! GraphQL API for tracking student projects and tasks: JWT authentication,
//! role-based authorization, derived project progress, directed chat, and
//! real-time subscriptions over an in-process event bus.

pub mod config;
pub mod error;
pub mod events;
pub mod graphql;
pub mod progress;
pub mod seed;
pub mod state;

use std::sync::Arc;

use async_graphql::http::{GraphiQLSource, ALL_WEBSOCKET_PROTOCOLS};
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use auth::{JwtConfig, JwtManager};
use axum::{
    extract::{State, WebSocketUpgrade},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use doc_store::DocumentStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::graphql::context::{bearer_token, resolve_session, Session};
use crate::graphql::{build_schema, AppSchema};
use crate::state::{AppState, SharedState};

/// Router state: the shared application state plus the built schema.
#[derive(Clone)]
pub struct ServerState {
    pub state: SharedState,
    pub schema: AppSchema,
}

/// Creates the application router with all routes configured.
pub fn create_app(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let server = ServerState {
        schema: build_schema(state.clone()),
        state,
    };

    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/graphql/ws", get(graphql_ws_handler))
        .route("/health", get(health_check))
        .with_state(server)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration and store.
pub fn create_state(config: Config, store: Arc<dyn DocumentStore>) -> SharedState {
    let jwt_config =
        JwtConfig::new(&config.jwt_secret).with_expiration_hours(config.jwt_expiration_hours);
    let jwt_manager = JwtManager::new(jwt_config);

    Arc::new(AppState::new(config, store, jwt_manager))
}

/// Executes a GraphQL request with the caller's session attached.
async fn graphql_handler(
    State(server): State<ServerState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let session = resolve_session(&server.state, bearer_token(&headers)).await;
    server
        .schema
        .execute(req.into_inner().data(session))
        .await
        .into()
}

/// Serves the GraphiQL playground.
async fn graphiql() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/graphql/ws")
            .finish(),
    )
}

/// Upgrades to the graphql-ws subscription transport.
///
/// The session is resolved once per connection from the `token` field of
/// the `connection_init` payload.
async fn graphql_ws_handler(
    State(server): State<ServerState>,
    protocol: GraphQLProtocol,
    upgrade: WebSocketUpgrade,
) -> Response {
    let ServerState { state, schema } = server;

    upgrade
        .protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |socket| {
            GraphQLWebSocket::new(socket, schema, protocol)
                .on_connection_init(move |payload| async move {
                    let token = payload
                        .get("token")
                        .and_then(|value| value.as_str())
                        .map(str::to_owned);
                    let session = resolve_session(&state, token.as_deref()).await;

                    let mut data = async_graphql::Data::default();
                    data.insert::<Session>(session);
                    Ok(data)
                })
                .serve()
        })
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
