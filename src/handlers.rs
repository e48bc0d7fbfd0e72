pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_valid::ValidRejection;
use tracing::debug;

use crate::schemas::ErrorResponse;

/// Extractor failures rendered as the JSON error envelope.
///
/// Use as `WithRejection<Valid<Query<T>>, ApiRejection>` so bad input reaches
/// the client as an `ErrorResponse` instead of axum's plain-text body.
#[derive(Debug)]
pub struct ApiRejection {
    status: StatusCode,
    message: String,
}

impl ApiRejection {
    fn new(status: StatusCode, message: String) -> Self {
        debug!("Rejecting request ({}): {}", status, message);
        Self { status, message }
    }
}

impl From<ValidRejection<QueryRejection>> for ApiRejection {
    fn from(rejection: ValidRejection<QueryRejection>) -> Self {
        match rejection {
            ValidRejection::Valid(errors) => Self::new(StatusCode::BAD_REQUEST, errors.to_string()),
            ValidRejection::Inner(inner) => Self::new(inner.status(), inner.body_text()),
        }
    }
}

impl From<ValidRejection<JsonRejection>> for ApiRejection {
    fn from(rejection: ValidRejection<JsonRejection>) -> Self {
        match rejection {
            ValidRejection::Valid(errors) => Self::new(StatusCode::BAD_REQUEST, errors.to_string()),
            ValidRejection::Inner(inner) => Self::new(inner.status(), inner.body_text()),
        }
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse::new(self.message, "VALIDATION_ERROR")),
        )
            .into_response()
    }
}
