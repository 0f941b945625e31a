// ABOUTME: Fixed prompt text and conversation limits
// ABOUTME: Shared by the context builder, the session and the API layer

/// Number of fields collected during intake
pub const TOTAL_FIELDS: usize = 3;

/// Number of prior turns sent to the model with each request
pub const HISTORY_WINDOW: usize = 10;

/// Label prefixed to assistant turns when they are replayed to the model
pub const ASSISTANT_LABEL: &str = "Asistente: ";

/// Base instruction that leads every system message
pub const BASE_SYSTEM_PROMPT: &str = "Eres un asistente de IA útil y amigable. \
Responde de manera conversacional y natural en español. \
Mantén tus respuestas concisas pero informativas. \
Tu objetivo es conocer la empresa donde trabaja el usuario, su industria y su rol.";

/// First assistant turn of every new session
pub const GREETING: &str =
    "¡Hola! Soy tu asistente de IA. Para empezar, ¿en qué empresa trabajas?";

/// Prompt used to probe whether the model endpoint is reachable
pub const CONNECTION_PROBE: &str = "Hola, ¿estás funcionando?";
