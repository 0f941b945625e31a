// ABOUTME: Intake authentication library for email/password sessions
// ABOUTME: Talks to a hosted auth provider and manages the session cookie

pub mod error;
pub mod session;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use session::{
    clear_session_cookie, session_cookie, token_from_cookie_header, AuthProvider,
    AuthProviderConfig, AuthSession, AuthUser, Credentials, SignUpOutcome, SupabaseAuth,
    UserMetadata, DEFAULT_COOKIE_NAME,
};
