use serde::Serialize;
use thiserror::Error;

use super::ErrorKind;

#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The stored version no longer matches the one the caller read, or the
    /// row is gone. Both surface here; the repository does not tell them apart.
    #[error("Edit conflict: {0}")]
    EditConflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error ({kind}): {message}")]
    Database { kind: ErrorKind, message: String },
}

impl AppError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Database { kind, .. } => Some(*kind),
            AppError::NotFound(_) => Some(ErrorKind::NotFound),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn is_edit_conflict(&self) -> bool {
        matches!(self, AppError::EditConflict(_))
    }

    /// Status the (out of crate) HTTP layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::EditConflict(_) => 409,
            AppError::Validation(_) => 422,
            AppError::Database { kind, .. } => kind.http_status(),
        }
    }

    /// Message safe to show a client: 500-class errors carry no internal detail.
    pub fn client_message(&self) -> String {
        match self.http_status() {
            404 => "the requested resource could not be found".to_string(),
            409 => "unable to update the record due to an edit conflict, please try again"
                .to_string(),
            422 => match self {
                AppError::Validation(message) => message.clone(),
                AppError::Database { kind, .. } => format!("invalid data ({})", kind),
                _ => "invalid data".to_string(),
            },
            _ => "the server encountered a problem and could not process your request"
                .to_string(),
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
