//! Server error types.

use async_graphql::ErrorExtensions;
use doc_store::StoreError;

/// Server error type.
///
/// Every resolver failure maps to one of these variants; the variant name
/// is surfaced to clients as a `code` extension on the GraphQL error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No or invalid credential on a guarded operation.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Authenticated but not permitted.
    #[error("{0}")]
    Forbidden(String),

    /// Missing or malformed arguments.
    #[error("{0}")]
    InvalidInput(String),

    /// Username already taken at signup.
    #[error("Username already exists")]
    DuplicateUsername,

    /// Referenced entity absent.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Task assigned to a non-student.
    #[error("Only students can be assigned to tasks")]
    InvalidAssignment,

    /// Login failure. Deliberately the same message for an unknown
    /// username and a wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Storage error.
    #[error("Storage error: {0}")]
    Store(StoreError),

    /// Authentication subsystem error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            // A store-level miss keeps its entity name and taxonomy code
            StoreError::NotFound { entity_type, .. } => ApiError::NotFound(entity_type),
            other => ApiError::Store(other),
        }
    }
}

impl ApiError {
    /// Machine-readable error code attached to the GraphQL error.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::InvalidInput(_) => "BAD_USER_INPUT",
            ApiError::DuplicateUsername => "DUPLICATE_USERNAME",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidAssignment => "INVALID_ASSIGNMENT",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Store(_) | ApiError::Auth(_) => "INTERNAL",
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

/// Converts a storage failure into a GraphQL error.
pub fn storage(e: StoreError) -> async_graphql::Error {
    ApiError::from(e).extend()
}

/// Builds a `NotFound` GraphQL error for the given entity.
pub fn not_found(entity: &'static str) -> async_graphql::Error {
    ApiError::NotFound(entity).extend()
}

/// Builds a `Forbidden` GraphQL error with the given message.
pub fn forbidden(message: impl Into<String>) -> async_graphql::Error {
    ApiError::Forbidden(message.into()).extend()
}

/// Builds an `InvalidInput` GraphQL error with the given message.
pub fn invalid_input(message: impl Into<String>) -> async_graphql::Error {
    ApiError::InvalidInput(message.into()).extend()
}

/// Converts an authentication subsystem failure into a GraphQL error.
pub fn auth_failure(e: auth::AuthError) -> async_graphql::Error {
    ApiError::from(e).extend()
}
