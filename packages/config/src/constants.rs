// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Intake

// Server Configuration
pub const INTAKE_HOST: &str = "INTAKE_HOST";
pub const INTAKE_PORT: &str = "INTAKE_PORT";
pub const PORT: &str = "PORT"; // Fallback used by most hosting platforms

// CORS Configuration
pub const CORS_ORIGIN: &str = "CORS_ORIGIN";

// Model Provider
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

// Auth Provider
pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const SESSION_COOKIE_NAME: &str = "SESSION_COOKIE_NAME";
pub const SESSION_COOKIE_SECURE: &str = "SESSION_COOKIE_SECURE";

// Conversation Sessions
pub const SESSION_IDLE_MINUTES: &str = "SESSION_IDLE_MINUTES";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
