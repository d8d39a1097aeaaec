use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Domain errors surfaced to clients. Every variant renders as
/// `{"error": "<message>"}` with the matching HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("Email ou senha inválidos.")]
    InvalidCredentials,
    #[error("Este e-mail já está cadastrado.")]
    DuplicateEmail,
    // Display stays generic; the wrapped error is logged server-side only.
    #[error("Erro interno no servidor.")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::DuplicateEmail => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            error!(error = %e, "internal server error");
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Store-layer failure, with constraint violations lifted out of the driver
/// error so handlers can match on them instead of sniffing codes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    ConstraintViolation(String),
    #[error(transparent)]
    Other(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = e {
            if db.is_unique_violation() {
                return StoreError::ConstraintViolation(
                    db.constraint().unwrap_or_default().to_string(),
                );
            }
        }
        StoreError::Other(e)
    }
}
