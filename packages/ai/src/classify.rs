// ABOUTME: Classification of upstream model failures into user-facing categories
// ABOUTME: Matches substrings of the error message; no structured error codes are used

use serde::{Deserialize, Serialize};

use crate::service::AIServiceError;

/// Category of a failed completion call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Auth,
    Quota,
    Network,
    Unknown,
}

impl ErrorCategory {
    /// Classify an error by the text of its message.
    ///
    /// Checked in order: "API key", then "quota"/"billing", then
    /// "network"/"fetch". Anything else is unknown.
    pub fn from_message(message: &str) -> Self {
        if message.contains("API key") {
            ErrorCategory::Auth
        } else if message.contains("quota") || message.contains("billing") {
            ErrorCategory::Quota
        } else if message.contains("network") || message.contains("fetch") {
            ErrorCategory::Network
        } else {
            ErrorCategory::Unknown
        }
    }

    /// Message shown to the user in the conversation
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::Auth => {
                "❌ Error de autenticación: Verifica que tu API key de OpenAI esté configurada correctamente."
            }
            ErrorCategory::Quota => {
                "💳 Error de cuota: Has excedido tu límite de uso de la API de OpenAI. Verifica tu plan de facturación."
            }
            ErrorCategory::Network => {
                "🌐 Error de conexión: No se pudo conectar con la API de OpenAI. Verifica tu conexión a internet."
            }
            ErrorCategory::Unknown => {
                "⚠️ Lo siento, hubo un error inesperado al procesar tu mensaje. Por favor, intenta de nuevo en unos momentos."
            }
        }
    }

    /// Machine-readable code used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::Auth => "UPSTREAM_AUTH",
            ErrorCategory::Quota => "UPSTREAM_QUOTA",
            ErrorCategory::Network => "UPSTREAM_NETWORK",
            ErrorCategory::Unknown => "UPSTREAM_UNKNOWN",
        }
    }
}

impl From<&AIServiceError> for ErrorCategory {
    fn from(error: &AIServiceError) -> Self {
        ErrorCategory::from_message(&error.to_string())
    }
}
