// ABOUTME: HTTP API layer for Intake providing REST endpoints and routing
// ABOUTME: Wires the conversation and auth handlers behind the session middleware

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod auth_handlers;
pub mod chat_handlers;
pub mod error;
pub mod health;
pub mod response;
pub mod state;

pub use auth::CurrentUser;
pub use error::{ApiResult, AppError};
pub use state::{AppState, CookieSettings, SessionStore};

/// Creates the chat API router (nested under /api/chat)
pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/", post(chat_handlers::send_message))
        .route("/session", get(chat_handlers::get_session))
        .route("/reset", post(chat_handlers::reset_session))
        .route("/connection", get(chat_handlers::test_connection))
}

/// Creates the public auth routes (nested under /api/auth)
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth_handlers::sign_up))
        .route("/signin", post(auth_handlers::sign_in))
}

/// Auth routes that need an existing session (nested under /api/auth)
pub fn create_account_router() -> Router<AppState> {
    Router::new()
        .route("/signout", post(auth_handlers::sign_out))
        .route("/user", get(auth_handlers::current_user))
}

/// Full application router with state applied
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/chat", create_chat_router())
        .nest("/api/auth", create_account_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/auth", create_auth_router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
