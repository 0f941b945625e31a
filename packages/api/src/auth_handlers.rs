// ABOUTME: HTTP handlers for account sign-up, sign-in and sign-out
// ABOUTME: Sets and clears the session cookie around the auth provider calls

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use intake_auth::{clear_session_cookie, session_cookie, AuthSession, AuthUser, Credentials};

use crate::{
    auth::CurrentUser,
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::{AppState, CookieSettings},
};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub user: AuthUser,
    /// False when the provider waits for email confirmation before sign-in
    pub signed_in: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: AuthUser,
    pub display_name: String,
}

impl From<AuthUser> for UserResponse {
    fn from(user: AuthUser) -> Self {
        Self {
            display_name: user.display_name().to_string(),
            user,
        }
    }
}

fn cookie_for(settings: &CookieSettings, session: &AuthSession) -> String {
    session_cookie(
        &settings.name,
        &session.access_token,
        session.expires_in,
        settings.secure,
    )
}

pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    let full_name = request
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let credentials = Credentials {
        email: request.email.trim().to_string(),
        password: request.password,
    };
    let outcome = state.auth.sign_up(&credentials, full_name).await?;

    let cookie = outcome
        .session
        .as_ref()
        .map(|session| cookie_for(&state.cookie, session));
    let body = Json(ApiResponse::success(SignUpResponse {
        user: outcome.user,
        signed_in: cookie.is_some(),
    }));

    Ok(match cookie {
        Some(cookie) => ([(SET_COOKIE, cookie)], body).into_response(),
        None => body.into_response(),
    })
}

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload.map_err(|e| AppError::validation(e.body_text()))?;
    let credentials = Credentials {
        email: request.email.trim().to_string(),
        password: request.password,
    };

    let session = state.auth.sign_in(&credentials).await?;
    info!(user_id = %session.user.id, "Session cookie issued");

    let cookie = cookie_for(&state.cookie, &session);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::success(UserResponse::from(session.user))),
    ))
}

/// Revoke the provider session, drop the conversation and clear the cookie
pub async fn sign_out(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    state.auth.sign_out(&user.access_token).await?;
    state.sessions.reset(&user.id).await;
    info!(user_id = %user.id, "User signed out");

    let cookie = clear_session_cookie(&state.cookie.name, state.cookie.secure);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(ApiResponse::success(serde_json::json!({ "signed_out": true }))),
    ))
}

pub async fn current_user(user: CurrentUser) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    Ok(Json(ApiResponse::success(UserResponse::from(user.user))))
}
