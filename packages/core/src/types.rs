// ABOUTME: Core data types for intake conversations
// ABOUTME: Fields, collected user info, completion flags and conversation turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::generate_turn_id;

/// One of the fields collected from the user, in collection order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Company,
    Industry,
    Role,
}

impl Field {
    /// All fields in the order they are collected
    pub const ALL: [Field; 3] = [Field::Company, Field::Industry, Field::Role];

    /// Label shown to the model in the progress block
    pub fn label(&self) -> &'static str {
        match self {
            Field::Company => "Empresa",
            Field::Industry => "Industria",
            Field::Role => "Rol",
        }
    }

    /// Question the model is told to ask while this field is pending
    pub fn prompt_hint(&self) -> &'static str {
        match self {
            Field::Company => "en qué empresa trabaja",
            Field::Industry => "a qué industria o sector pertenece su empresa",
            Field::Role => "cuál es su rol o cargo",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Company => "company",
            Field::Industry => "industry",
            Field::Role => "role",
        };
        f.write_str(name)
    }
}

/// Values captured for each field. Empty until the field is completed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    company: String,
    industry: String,
    role: String,
}

impl UserInfo {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Company => &self.company,
            Field::Industry => &self.industry,
            Field::Role => &self.role,
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn industry(&self) -> &str {
        &self.industry
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub(crate) fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Company => self.company = value,
            Field::Industry => self.industry = value,
            Field::Role => self.role = value,
        }
    }
}

/// Completion flags, one per field. Flags only ever go from false to true.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoStatus {
    company: bool,
    industry: bool,
    role: bool,
}

impl InfoStatus {
    pub fn is_done(&self, field: Field) -> bool {
        match field {
            Field::Company => self.company,
            Field::Industry => self.industry,
            Field::Role => self.role,
        }
    }

    pub(crate) fn mark_done(&mut self, field: Field) {
        match field {
            Field::Company => self.company = true,
            Field::Industry => self.industry = true,
            Field::Role => self.role = true,
        }
    }
}

/// Who wrote a turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// A single message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub id: String,
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(author: Author, content: impl Into<String>) -> Self {
        Self {
            id: generate_turn_id(),
            content: content.into(),
            author,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Author::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Author::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order() {
        assert_eq!(Field::ALL, [Field::Company, Field::Industry, Field::Role]);
    }

    #[test]
    fn test_field_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Field::Industry).unwrap(), "\"industry\"");
        assert_eq!(Field::Role.to_string(), "role");
    }

    #[test]
    fn test_defaults_are_empty() {
        let info = UserInfo::default();
        let status = InfoStatus::default();

        for field in Field::ALL {
            assert_eq!(info.get(field), "");
            assert!(!status.is_done(field));
        }
    }

    #[test]
    fn test_turn_constructors() {
        let user = Turn::user("hola");
        let assistant = Turn::assistant("buenas");

        assert!(user.is_user());
        assert!(!assistant.is_user());
        assert_ne!(user.id, assistant.id);
        assert!(assistant.created_at >= user.created_at);
    }
}
