use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lists_core::{AccountError, ListError, Violations};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::{auth::AuthError, store::StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Validation(#[from] Violations),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Account does not exist with this email")]
    UnknownAccount,

    #[error("An account already exists with this email")]
    DuplicateAccount,

    #[error("Incorrect email or password")]
    WrongPassword,

    #[error("Account was modified by another request, retry")]
    Conflict,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::UnknownAccount,
            StoreError::DuplicateKey(_) => AppError::DuplicateAccount,
            StoreError::VersionConflict { .. } => AppError::Conflict,
            StoreError::Corrupt { .. } => AppError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedPayload(err.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Account(AccountError::Hashing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::List(_)
            | AppError::Account(_)
            | AppError::Validation(_)
            | AppError::MalformedPayload(_)
            | AppError::UnknownAccount
            | AppError::DuplicateAccount => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::WrongPassword => StatusCode::UNAUTHORIZED,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            debug!(error = %self, %status, "request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
