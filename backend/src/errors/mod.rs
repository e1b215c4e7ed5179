//! Global application error types and handlers.
//!
//! Every handler returns [`AppError`] on failure; its `IntoResponse` impl maps
//! each variant to a status code and a small JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{auth::AuthError, database::DatabaseError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MalformedPayload(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("No view at {0}")]
    NotFound(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            AppError::Auth(AuthError::Rejected(_)) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(path) => json!({
                "view": "not_found",
                "path": path,
                "error": self.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}
