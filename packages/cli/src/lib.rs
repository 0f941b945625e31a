// ABOUTME: Server bootstrap for Intake
// ABOUTME: Builds providers from the environment and serves the API router

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use intake_ai::{AIService, CompletionClient};
use intake_api::{create_router, AppState, CookieSettings, SessionStore};
use intake_auth::SupabaseAuth;

pub mod config;
pub mod middleware;

use config::Config;

/// Providers and session store for a server run
pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let completion = AIService::new();
    if completion.is_configured() {
        info!(model = %completion.model(), "Completion client configured");
    } else {
        // Chat requests answer with a configuration error until a key is set
        warn!("OPENAI_API_KEY is missing or still the placeholder value");
    }

    let auth = SupabaseAuth::from_env().context("Failed to configure the auth provider")?;

    Ok(AppState::new(
        Arc::new(completion),
        Arc::new(auth),
        CookieSettings {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
        },
    ))
}

/// API router with CORS and panic recovery applied
pub fn build_app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let origin = config::parse_cors_origin(&config.cors_origin)?;

    // Credentials are needed for the session cookie
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    Ok(create_router(state)
        .layer(cors)
        .layer(middleware::create_panic_handler()))
}

/// Periodically drop conversations nobody has touched for `idle_minutes`
pub fn start_eviction_task(sessions: SessionStore, idle_minutes: u64) {
    tokio::spawn(async move {
        let max_idle = chrono::Duration::minutes(idle_minutes as i64);
        let period = Duration::from_secs((idle_minutes * 60 / 4).max(60));

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(idle_minutes, "Started idle session eviction task");

        loop {
            interval.tick().await;
            sessions.evict_idle(max_idle).await;
        }
    });
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    start_eviction_task(state.sessions.clone(), config.session_idle_minutes);
    let app = build_app(state, &config)?;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(address = %addr, cors_origin = %config.cors_origin, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
