// ABOUTME: Hosted chat model integration for Intake
// ABOUTME: Chat completion client and classification of upstream failures

pub mod classify;
pub mod service;

// Re-export service types
pub use service::{
    AIResponse, AIService, AIServiceError, AIServiceResult, CompletionClient, Usage,
    PLACEHOLDER_API_KEY,
};

pub use classify::ErrorCategory;
