// ABOUTME: Authentication context for API requests
// ABOUTME: Session cookie middleware plus the CurrentUser extractor for handlers

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::COOKIE, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use intake_auth::{token_from_cookie_header, AuthUser};

use crate::{error::AppError, state::AppState};

/// Current authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub user: AuthUser,
    /// Provider access token from the session cookie, needed for sign-out
    pub access_token: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // require_session stores the verified user when the cookie checks out
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Reject the request unless it carries a session cookie the provider accepts
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = request
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| token_from_cookie_header(header, &state.cookie.name));

    let Some(token) = token else {
        warn!(path = %path, "Missing session cookie");
        return Err(AppError::Unauthorized);
    };

    let user = match state.auth.get_user(&token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(path = %path, "Session cookie rejected by auth provider");
            return Err(AppError::Unauthorized);
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Session verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    debug!(path = %path, user_id = %user.id, "Session validated");

    request.extensions_mut().insert(CurrentUser {
        id: user.id.clone(),
        user,
        access_token: token,
    });

    Ok(next.run(request).await)
}
