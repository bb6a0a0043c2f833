//! Per-request session resolution.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use entities::User;

use crate::state::AppState;

/// Identity attached to a request or subscription connection.
///
/// `user` is `None` for anonymous callers; resolution never fails so that
/// operations without identity requirements still resolve.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The authenticated user, if any.
    pub user: Option<User>,
}

impl Session {
    /// Creates an authenticated session.
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Creates an anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Extracts the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Resolves a bearer token into a session.
///
/// A missing, invalid, or expired token, or a token whose user no longer
/// exists, yields an anonymous session rather than an error.
pub async fn resolve_session(state: &AppState, token: Option<&str>) -> Session {
    let Some(token) = token else {
        return Session::anonymous();
    };

    let claims = match state.jwt_manager.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return Session::anonymous();
        }
    };

    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(_) => return Session::anonymous(),
    };

    match state.store.get_user(user_id).await {
        Ok(Some(user)) => Session::authenticated(user),
        Ok(None) => {
            tracing::debug!(%user_id, "Token references a user that no longer exists");
            Session::anonymous()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load user for session");
            Session::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_non_bearer_scheme_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
