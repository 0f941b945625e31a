// ABOUTME: Session authentication module
// ABOUTME: Provider client, session cookies and user/session types

pub mod cookie;
pub mod provider;
pub mod types;

pub use cookie::{
    clear_session_cookie, session_cookie, token_from_cookie_header, DEFAULT_COOKIE_NAME,
};
pub use provider::{AuthProvider, AuthProviderConfig, SupabaseAuth};
pub use types::{AuthSession, AuthUser, Credentials, SignUpOutcome, UserMetadata};
