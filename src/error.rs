//! Error types for lesson video generation.

/// Message shown when a submission has no usable prompt.
pub const VALIDATION_MESSAGE: &str = "Please enter a prompt or select a lesson";

/// Message shown when a lesson key is not in the catalog.
pub const UNKNOWN_LESSON_MESSAGE: &str = "Please select one of the available lessons";

/// Message shown for every failed generation request.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate video";

/// Errors that can occur while preparing or running a generation request.
#[derive(Debug, thiserror::Error)]
pub enum TtvError {
    /// The effective prompt was empty after trimming.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// A lesson key that is not in the catalog.
    #[error("unknown lesson: {0}")]
    UnknownLesson(String),

    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the body, or the raw body text.
        message: String,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered 2xx but the body was not what we expect.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (e.g., saving a downloaded video).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request the service would refuse (e.g., a filename with `/`).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid service configuration (e.g., an unparsable base URL).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TtvError {
    /// Returns true for local input problems that never reached the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyPrompt | Self::UnknownLesson(_))
    }

    /// The message a user sees for this error.
    ///
    /// Remote failures all collapse to the same text; the detail is only
    /// available through `Display` for logging.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyPrompt => VALIDATION_MESSAGE,
            Self::UnknownLesson(_) => UNKNOWN_LESSON_MESSAGE,
            _ => GENERATION_FAILED_MESSAGE,
        }
    }
}

/// Result type alias for lesson video operations.
pub type Result<T> = std::result::Result<T, TtvError>;

/// Maximum length of a service error message kept for logging.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Extracts a readable message from a service error body.
///
/// The generation service answers failures with `{"error": "..."}`. Anything
/// else is kept as raw text, truncated on a char boundary.
pub(crate) fn error_message_from_body(text: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    let message = match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => body.error,
        Err(_) => text.trim().to_string(),
    };

    if message.len() <= MAX_ERROR_MESSAGE_LEN {
        return message;
    }
    let mut end = MAX_ERROR_MESSAGE_LEN;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}
