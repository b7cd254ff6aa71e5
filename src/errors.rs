use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to load quiz: {0}")]
    QuizLoad(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::SessionExpired => "SESSION_EXPIRED",
            AppError::NetworkError(_) => "NETWORK_ERROR",
            AppError::Timeout => "TIMEOUT",
            AppError::ApiError { .. } => "API_ERROR",
            AppError::QuizLoad(_) => "QUIZ_LOAD_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Errors the user can sensibly retry without changing their input.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout => true,
            AppError::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired)
    }

    /// Maps a non-success HTTP status to the error the caller sees.
    pub fn from_status(status: u16, message: Option<String>, endpoint: &str) -> Self {
        match status {
            401 => AppError::SessionExpired,
            404 => AppError::NotFound(format!("Endpoint not found: {}", endpoint)),
            _ => AppError::ApiError {
                status,
                message: message
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            },
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout
        } else if err.is_decode() {
            AppError::ValidationError(format!("Malformed response body: {}", err))
        } else {
            AppError::NetworkError(err.to_string())
        }
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON error: {}", err))
    }
}
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(AppError::from_status(401, None, "/profile").is_session_expired());
        assert!(matches!(
            AppError::from_status(404, None, "/modules/3"),
            AppError::NotFound(msg) if msg.contains("/modules/3")
        ));
        match AppError::from_status(422, Some("Bad email".into()), "/register") {
            AppError::ApiError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Bad email");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping_default_message() {
        let err = AppError::from_status(500, None, "/quizzes/1/submit");
        assert_eq!(
            err.to_string(),
            "Request failed with status 500: Request failed with status 500"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(AppError::Timeout.is_retryable());
        assert!(AppError::NetworkError("reset".into()).is_retryable());
        assert!(AppError::ApiError { status: 503, message: "down".into() }.is_retryable());
        assert!(!AppError::ApiError { status: 400, message: "bad".into() }.is_retryable());
        assert!(!AppError::SessionExpired.is_retryable());
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("quiz".into());
        assert_eq!(err.to_string(), "Not found: quiz");
        assert_eq!(
            AppError::SessionExpired.to_string(),
            "Session expired. Please login again."
        );
    }
}
