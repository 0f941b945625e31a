// ABOUTME: Client for the hosted auth provider (Supabase-compatible REST API)
// ABOUTME: Sign-up, password sign-in, sign-out and access token verification

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};
use url::Url;

use intake_config::constants::{SUPABASE_ANON_KEY, SUPABASE_URL};

use crate::{
    error::{AuthError, AuthResult},
    session::types::{AuthSession, AuthUser, Credentials, SignUpOutcome},
};

/// Account operations the HTTP layer needs from an auth provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        full_name: Option<&str>,
    ) -> AuthResult<SignUpOutcome>;

    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<AuthSession>;

    async fn sign_out(&self, access_token: &str) -> AuthResult<()>;

    /// Returns the user for a valid token, `None` for an unknown or expired one
    async fn get_user(&self, access_token: &str) -> AuthResult<Option<AuthUser>>;
}

/// Connection settings for the auth provider
#[derive(Debug, Clone)]
pub struct AuthProviderConfig {
    pub url: Url,
    pub anon_key: String,
}

impl AuthProviderConfig {
    pub fn new(url: &str, anon_key: impl Into<String>) -> AuthResult<Self> {
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(AuthError::Configuration(format!(
                "{} must not be empty",
                SUPABASE_ANON_KEY
            )));
        }
        Ok(Self {
            url: Url::parse(url)?,
            anon_key,
        })
    }

    /// Read SUPABASE_URL and SUPABASE_ANON_KEY from the environment
    pub fn from_env() -> AuthResult<Self> {
        let url = std::env::var(SUPABASE_URL).map_err(|_| {
            AuthError::Configuration(format!("Missing {} environment variable", SUPABASE_URL))
        })?;
        let anon_key = std::env::var(SUPABASE_ANON_KEY).map_err(|_| {
            AuthError::Configuration(format!(
                "Missing {} environment variable",
                SUPABASE_ANON_KEY
            ))
        })?;
        Self::new(&url, anon_key)
    }
}

/// Body returned by sign-up: a full session when auto-confirm is on,
/// otherwise just the pending user
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

/// Error shapes the provider uses across endpoints
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ProviderErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Auth provider client
#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    config: AuthProviderConfig,
}

impl SupabaseAuth {
    pub fn new(config: AuthProviderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> AuthResult<Self> {
        Ok(Self::new(AuthProviderConfig::from_env()?))
    }

    fn endpoint(&self, path: &str) -> AuthResult<Url> {
        Ok(self.config.url.join(path)?)
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.config.anon_key)
    }

    async fn provider_error(response: Response) -> AuthError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ProviderErrorBody>(&body)
            .ok()
            .and_then(ProviderErrorBody::into_message)
            .unwrap_or(body);
        error!("Auth provider error: {} - {}", status, detail);
        AuthError::Provider(format!("{}: {}", status, detail))
    }

    /// Register a new account with email and password
    pub async fn sign_up(
        &self,
        credentials: &Credentials,
        full_name: Option<&str>,
    ) -> AuthResult<SignUpOutcome> {
        validate_credentials(credentials)?;
        info!("Signing up new account");

        let response = self
            .with_api_key(self.client.post(self.endpoint("auth/v1/signup")?))
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let outcome = match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(session) => SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            },
            SignUpResponse::User(user) => SignUpOutcome {
                user,
                session: None,
            },
        };

        info!(
            user_id = %outcome.user.id,
            confirmed = outcome.session.is_some(),
            "Account created"
        );
        Ok(outcome)
    }

    /// Exchange email and password for a session
    pub async fn sign_in(&self, credentials: &Credentials) -> AuthResult<AuthSession> {
        validate_credentials(credentials)?;

        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .with_api_key(self.client.post(url))
            .json(credentials)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let session: AuthSession = response.json().await?;
                info!(user_id = %session.user.id, "User signed in");
                Ok(session)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                warn!("Sign-in rejected by auth provider");
                Err(AuthError::InvalidCredentials)
            }
            _ => Err(Self::provider_error(response).await),
        }
    }

    /// Revoke the session behind `access_token`
    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let response = self
            .with_api_key(self.client.post(self.endpoint("auth/v1/logout")?))
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!("User signed out");
                Ok(())
            }
            // Already gone on the provider side
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!("Sign-out for a session the provider no longer knows");
                Ok(())
            }
            _ => Err(Self::provider_error(response).await),
        }
    }

    /// Look up the user that owns `access_token`
    pub async fn get_user(&self, access_token: &str) -> AuthResult<Option<AuthUser>> {
        let response = self
            .with_api_key(self.client.get(self.endpoint("auth/v1/user")?))
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("Access token rejected by auth provider");
                Ok(None)
            }
            _ => Err(Self::provider_error(response).await),
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_up(
        &self,
        credentials: &Credentials,
        full_name: Option<&str>,
    ) -> AuthResult<SignUpOutcome> {
        SupabaseAuth::sign_up(self, credentials, full_name).await
    }

    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<AuthSession> {
        SupabaseAuth::sign_in(self, credentials).await
    }

    async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        SupabaseAuth::sign_out(self, access_token).await
    }

    async fn get_user(&self, access_token: &str) -> AuthResult<Option<AuthUser>> {
        SupabaseAuth::get_user(self, access_token).await
    }
}

fn validate_credentials(credentials: &Credentials) -> AuthResult<()> {
    if !credentials.email.contains('@') {
        return Err(AuthError::InvalidInput("email is not valid".to_string()));
    }
    if credentials.password.is_empty() {
        return Err(AuthError::InvalidInput("password is required".to_string()));
    }
    Ok(())
}
