// ABOUTME: Panic recovery layer for the HTTP server
// ABOUTME: Turns a handler panic into the standard AppError envelope

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use intake_api::AppError;

type PanicPayload = Box<dyn Any + Send + 'static>;

pub fn create_panic_handler() -> CatchPanicLayer<fn(PanicPayload) -> Response> {
    CatchPanicLayer::custom(panic_response)
}

/// The panic text is logged by `AppError::Internal` and never sent to the client
fn panic_response(payload: PanicPayload) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}
