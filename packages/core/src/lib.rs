// ABOUTME: Core conversation logic for Intake
// ABOUTME: Field extraction, progress tracking, prompt context and session assembly

pub mod constants;
pub mod context;
pub mod extractor;
pub mod progress;
pub mod session;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{Author, Field, InfoStatus, Turn, UserInfo};

pub use context::{build_system_prompt, render_progress};
pub use extractor::{extract, Extraction};
pub use progress::{Progress, ProgressSnapshot, Stage};
pub use session::{ChatMessage, ChatRole, ConversationSession, PreparedTurn};

// Re-export constants
pub use constants::{BASE_SYSTEM_PROMPT, CONNECTION_PROBE, GREETING, HISTORY_WINDOW, TOTAL_FIELDS};

// Re-export utilities
pub use utils::generate_turn_id;
