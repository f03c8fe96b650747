use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed `Authorization` header
    Unauthenticated,
    InvalidToken(String),
    Expired,
    /// Role or ownership mismatch. Never says whether the target exists.
    Forbidden,
    InvalidAmount(String),
    InvalidRequest(String),
    NotFound(String),
    DatabaseError(String),
    ProcessorError(String),
    Configuration(String),
}

impl AppError {
    /// Database and processor failures, reported as 5xx without retry
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, AppError::DatabaseError(_) | AppError::ProcessorError(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "Missing authorization token"),
            AppError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AppError::Expired => write!(f, "Token expired"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::ProcessorError(msg) => write!(f, "Payment processor error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidToken(_) | AppError::Expired => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::InvalidAmount(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ProcessorError(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_) | AppError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Unauthenticated | AppError::InvalidToken(_) | AppError::Expired => {
                serde_json::json!({ "message": "unauthorized access" })
            }
            AppError::Forbidden => serde_json::json!({ "message": "forbidden access" }),
            AppError::InvalidAmount(_) | AppError::InvalidRequest(_) | AppError::NotFound(_) => {
                serde_json::json!({ "message": self.to_string() })
            }
            AppError::DatabaseError(_) | AppError::ProcessorError(_) | AppError::Configuration(_) => {
                serde_json::json!({ "error": self.to_string() })
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        AppError::DatabaseError(format!("Failed to encode document: {}", e))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        AppError::DatabaseError(format!("Failed to decode document: {}", e))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::ProcessorError(e.to_string())
    }
}
