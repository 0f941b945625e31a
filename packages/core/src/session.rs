// ABOUTME: In-memory conversation session and model message assembly
// ABOUTME: Each turn is a pure transition from one session value to the next

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{ASSISTANT_LABEL, GREETING, HISTORY_WINDOW};
use crate::context::build_system_prompt;
use crate::extractor::extract;
use crate::progress::{Progress, ProgressSnapshot};
use crate::types::{Field, InfoStatus, Turn, UserInfo};

/// Role of a message sent to the model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A role-tagged message in the model request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        if turn.is_user() {
            ChatMessage::user(turn.content.clone())
        } else {
            ChatMessage::assistant(format!("{}{}", ASSISTANT_LABEL, turn.content))
        }
    }
}

/// Conversation state owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationSession {
    turns: Vec<Turn>,
    info: UserInfo,
    status: InfoStatus,
}

/// Outcome of accepting a user utterance, before the model has replied
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    /// Session with extraction applied and the user turn appended
    pub session: ConversationSession,
    /// Messages to send to the model
    pub messages: Vec<ChatMessage>,
    /// Field completed by this utterance, if any
    pub filled: Option<Field>,
}

impl ConversationSession {
    /// New session opened with the assistant greeting
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
            info: UserInfo::default(),
            status: InfoStatus::default(),
        }
    }

    /// New session with no turns at all
    pub fn empty() -> Self {
        Self {
            turns: Vec::new(),
            info: UserInfo::default(),
            status: InfoStatus::default(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn info(&self) -> &UserInfo {
        &self.info
    }

    pub fn status(&self) -> &InfoStatus {
        &self.status
    }

    pub fn progress(&self) -> Progress<'_> {
        Progress::new(&self.info, &self.status)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progress().snapshot()
    }

    /// Build the model request: system prompt, the last `HISTORY_WINDOW`
    /// turns in order, then `utterance` as the final user message.
    pub fn assemble_messages(&self, utterance: &str) -> Vec<ChatMessage> {
        let start = self.turns.len().saturating_sub(HISTORY_WINDOW);
        let recent = &self.turns[start..];

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(ChatMessage::system(build_system_prompt(&self.progress())));
        messages.extend(recent.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(utterance));
        messages
    }

    /// Accept a user utterance: run extraction, assemble the model request
    /// from the prior history and append the user turn.
    pub fn prepare_turn(&self, utterance: &str) -> PreparedTurn {
        let extraction = extract(&self.info, &self.status, utterance);
        if let Some(field) = extraction.filled {
            info!(field = %field, "Intake field completed");
        }

        let mut next = Self {
            turns: self.turns.clone(),
            info: extraction.info,
            status: extraction.status,
        };
        let messages = next.assemble_messages(utterance);
        next.turns.push(Turn::user(utterance));

        PreparedTurn {
            session: next,
            messages,
            filled: extraction.filled,
        }
    }

    /// Append an assistant turn
    pub fn record_reply(&mut self, content: impl Into<String>) -> &Turn {
        self.turns.push(Turn::assistant(content));
        &self.turns[self.turns.len() - 1]
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
