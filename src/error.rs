use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
///
/// Two outcomes of the engine are deliberately *not* errors: an empty
/// candidate pool after filtering (surfaced as a normal response with a
/// "no current recommendations" message), and a profiled species without
/// a seasonality entry (treated as never in season and logged where it
/// is skipped).
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Missing artifact: {0}")]
    MissingArtifact(String),

    #[error("Malformed artifact {artifact}: {message}")]
    MalformedArtifact { artifact: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a malformed-artifact error tagged with the artifact name.
    pub fn malformed(artifact: &str, message: impl Into<String>) -> Self {
        AppError::MalformedArtifact {
            artifact: artifact.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MissingArtifact(_) | AppError::MalformedArtifact { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Io(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
