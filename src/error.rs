// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the engine and for consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Deterministic input errors raised by the trail and ledger engine.
///
/// None of these are transient, so callers should never retry them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    #[error("Invalid stride length: {0} cm")]
    InvalidStride(f64),

    #[error("Cumulative distance would decrease from {previous} m to {next} m")]
    NonMonotonicDistance { previous: f64, next: f64 },

    #[error("Unknown trail: {0}")]
    UnknownTrail(String),

    #[error("Trail not available for this account: {0}")]
    NotEntitled(String),
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Engine(err) => match err {
                EngineError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "invalid_date"),
                EngineError::InvalidMeasurement(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_measurement")
                }
                EngineError::InvalidStride(_) => (StatusCode::BAD_REQUEST, "invalid_stride"),
                EngineError::NonMonotonicDistance { .. } => {
                    (StatusCode::CONFLICT, "non_monotonic_distance")
                }
                EngineError::UnknownTrail(_) => (StatusCode::NOT_FOUND, "unknown_trail"),
                EngineError::NotEntitled(_) => (StatusCode::FORBIDDEN, "not_entitled"),
            },
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();
        let details = match &self {
            AppError::Engine(err) => Some(err.to_string()),
            AppError::NotFound(msg) | AppError::BadRequest(msg) => Some(msg.clone()),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                None
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                None
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_client_statuses() {
        let cases = [
            (EngineError::InvalidDate("x".into()), StatusCode::BAD_REQUEST),
            (EngineError::InvalidStride(0.0), StatusCode::BAD_REQUEST),
            (
                EngineError::NonMonotonicDistance {
                    previous: 10.0,
                    next: 5.0,
                },
                StatusCode::CONFLICT,
            ),
            (EngineError::UnknownTrail("x".into()), StatusCode::NOT_FOUND),
            (EngineError::NotEntitled("x".into()), StatusCode::FORBIDDEN),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_internal_error_is_500() {
        let response = AppError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
