// src/error.rs
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ChatResponse;
use crate::services::audio::SynthesisError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error contacting AI: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("Error contacting AI: {message}")]
    BadRequest { status: StatusCode, message: String },
    #[error("Invalid request method.")]
    MethodNotAllowed,
    #[error("Error contacting AI: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest { status, .. } => *status,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Synthesis(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, %status, "request rejected");
        }
        let body = ChatResponse::error(self.to_string());
        (status, Json(body)).into_response()
    }
}
