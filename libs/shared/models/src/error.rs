use thiserror::Error;

/// Failures the backend client can report to a screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl AppError {
    /// Map a non-success HTTP status and the backend's message to a variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => AppError::Auth(message),
            400 | 409 | 422 => AppError::Validation(message),
            _ => AppError::Server { status, message },
        }
    }

    /// Text shown to the user. Validation messages come from the backend and
    /// are shown verbatim.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Transport(msg) => msg,
            AppError::Auth(msg) => msg,
            AppError::Validation(msg) => msg,
            AppError::Server { message, .. } => message,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Transport(format!("Malformed response: {}", err))
    }
}
