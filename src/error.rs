use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::records::ParseError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pipe pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to parse {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to coerce {key} line {line}: {message}")]
    Coercion {
        key: String,
        line: u64,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred")
            }
            Self::HttpRequest(ref e) => {
                tracing::error!("HTTP request error: {}", e);
                (StatusCode::BAD_GATEWAY, "External service request failed")
            }
            Self::Serialization(_) | Self::Csv(_) | Self::Parse { .. } | Self::Coercion { .. } => {
                tracing::error!("Data processing error: {}", self);
                (StatusCode::UNPROCESSABLE_ENTITY, "Data processing error")
            }
            Self::Io(ref e) => {
                tracing::error!("I/O error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error occurred")
            }
            Self::Storage(ref msg) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error occurred")
            }
            Self::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            Self::Authentication(ref msg) => (StatusCode::UNAUTHORIZED, msg.as_str()),
            Self::ExternalApi(ref msg) => (StatusCode::BAD_GATEWAY, msg.as_str()),
            Self::Pattern(_) | Self::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error")
            }
            Self::Other(ref e) => {
                tracing::error!("Unexpected error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
