/// Error types for the social API
///
/// Errors form a closed taxonomy so handlers and tests can match on the
/// variant instead of string-comparing messages. Every error renders the
/// uniform `{success: false, message}` envelope.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Result type for social-api operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed request input
    #[error("{0}")]
    Validation(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// Missing or invalid credentials
    #[error("unauthorized")]
    Unauthorized,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Cache operation failed
    #[error("cache error: {0}")]
    Cache(String),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error is a transient infrastructure hiccup worth retrying.
    ///
    /// Pool exhaustion and I/O failures happen before a statement commits,
    /// so re-executing the write is safe; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Database(err) => matches!(
                err,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            AppError::Cache(_) => true,
            _ => false,
        }
    }

    fn public_message(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            "Something went wrong".to_string()
        } else {
            message
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Config(_)
            | AppError::Database(_)
            | AppError::Cache(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.public_message(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("comment text is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("post not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("not the author".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(AppError::Database(sqlx::Error::PoolTimedOut).is_transient());
        assert!(AppError::Database(sqlx::Error::PoolClosed).is_transient());
        assert!(AppError::Database(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset"
        )))
        .is_transient());
        assert!(AppError::Cache("redis down".into()).is_transient());

        assert!(!AppError::Database(sqlx::Error::RowNotFound).is_transient());
        assert!(!AppError::Validation("bad input".into()).is_transient());
        assert!(!AppError::NotFound("missing".into()).is_transient());
        assert!(!AppError::Forbidden("nope".into()).is_transient());
    }

    #[test]
    fn test_error_envelope_shape() {
        let response = AppError::NotFound("Post with id was not found".into()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
