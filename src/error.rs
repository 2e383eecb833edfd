use std::collections::BTreeMap;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A database pool error.
    #[error("Database pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// The request body is not valid JSON.
    #[error("Request body is not valid JSON")]
    InvalidJson,

    /// One or more request fields failed validation.
    #[error("Invalid input data")]
    Validation(BTreeMap<&'static str, String>),

    /// A malformed request that is not a field-validation failure.
    #[error("{0}")]
    BadRequest(String),

    /// Login failed. Covers unknown email and wrong password alike.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The request carries no usable session.
    #[error("Not authenticated")]
    Unauthenticated,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// An insert collided with the unique email constraint.
    #[error("Email already exists")]
    DuplicateEmail,

    /// A password hashing error.
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<&'static str, String>>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                    None,
                )
            }

            AppError::Pool(ref e) => {
                tracing::error!("Database pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                    None,
                )
            }

            AppError::InvalidJson => {
                tracing::debug!("Rejected request body: not valid JSON");
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_JSON",
                    "Request body is not valid JSON".to_string(),
                    None,
                )
            }

            AppError::Validation(fields) => {
                tracing::debug!("Validation error: {:?}", fields);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "VALIDATION_ERROR",
                    "Invalid input data".to_string(),
                    Some(fields),
                )
            }

            AppError::BadRequest(msg) => {
                tracing::debug!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None)
            }

            AppError::InvalidCredentials => {
                tracing::warn!("Login failed: invalid credentials");
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid email or password".to_string(),
                    None,
                )
            }

            AppError::Unauthenticated => {
                tracing::debug!("Request rejected: not authenticated");
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHENTICATED",
                    "Unauthorized: Invalid user session".to_string(),
                    None,
                )
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "Resource not found".to_string(),
                    None,
                )
            }

            AppError::DuplicateEmail => {
                tracing::debug!("Signup rejected: duplicate email");
                (
                    StatusCode::CONFLICT,
                    "DUPLICATE_EMAIL",
                    "Email already exists".to_string(),
                    None,
                )
            }

            AppError::Hashing(ref msg) => {
                tracing::error!("Password hashing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_ERROR",
                    "Internal server error".to_string(),
                    None,
                )
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SERVER_ERROR",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = sonic_rs::to_string(&ErrorBody {
            error: ErrorDetail { code, message, fields },
        })
        .unwrap_or_else(|_| {
            r#"{"error":{"code":"SERVER_ERROR","message":"Internal server error"}}"#.to_string()
        });

        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
