use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum DeskError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("missing or invalid caller identity")]
    Unauthenticated,

    #[error("invalid or missing desk key")]
    Unauthorized,

    #[error("text generation failed: {0}")]
    Generation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    /// Error returned by a remote desk server. Responses without an error
    /// envelope carry the `REMOTE_ERROR` code.
    #[error("remote call failed with {status}: {code}: {message}")]
    Remote {
        status: StatusCode,
        code: String,
        message: String,
    },
}

impl DeskError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DeskError::NotFound { .. } | DeskError::UnknownTool(_) => StatusCode::NOT_FOUND,
            DeskError::Unauthenticated | DeskError::Unauthorized => StatusCode::UNAUTHORIZED,
            DeskError::InvalidInput(_) | DeskError::Json(_) => StatusCode::BAD_REQUEST,
            DeskError::Generation(_)
            | DeskError::Reqwest(_)
            | DeskError::UrlParse(_)
            | DeskError::UpstreamStatus(_)
            | DeskError::Remote { .. } => StatusCode::BAD_GATEWAY,
            DeskError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DeskError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DeskError::NotFound { .. } => "NOT_FOUND",
            DeskError::UnknownTool(_) => "UNKNOWN_TOOL",
            DeskError::Unauthenticated => "UNAUTHENTICATED",
            DeskError::Unauthorized => "UNAUTHORIZED",
            DeskError::InvalidInput(_) | DeskError::Json(_) => "INVALID_INPUT",
            DeskError::Generation(_)
            | DeskError::Reqwest(_)
            | DeskError::UrlParse(_)
            | DeskError::UpstreamStatus(_) => "GENERATION_FAILED",
            DeskError::Remote { .. } => "REMOTE_ERROR",
            DeskError::DatabaseError(_) => "STORE_ERROR",
            DeskError::Config(_) => "INTERNAL_ERROR",
        }
    }
}

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for DeskError {
    fn is_retryable(&self) -> bool {
        match self {
            DeskError::Reqwest(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            DeskError::UpstreamStatus(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let code = self.code().to_string();
        let message = match &self {
            DeskError::DatabaseError(e) => {
                error!(error = %e, "store operation failed");
                "The record store failed to process the request.".to_string()
            }
            DeskError::Config(e) => {
                error!(error = %e, "configuration error surfaced at request time");
                "An internal server error occurred.".to_string()
            }
            DeskError::Reqwest(_) | DeskError::UrlParse(_) | DeskError::UpstreamStatus(_) => {
                error!(error = %self, "text generator unreachable");
                "The text generation service is unavailable.".to_string()
            }
            other => other.to_string(),
        };
        (
            status,
            Json(ApiErrorResponse {
                error: ApiErrorBody { code, message },
            }),
        )
            .into_response()
    }
}

/// Standardized API error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
