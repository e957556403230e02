//! Error responses

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::{Error, ErrorKind};

#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    /// Request could not be decoded by an extractor.
    Rejected { status: StatusCode, message: String },
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self { Self::Core(e) }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self { Self::Rejected { status: r.status(), message: r.body_text() } }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self { Self::Rejected { status: r.status(), message: r.body_text() } }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self { Self::Rejected { status: r.status(), message: r.body_text() } }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, class, message) = match self {
            Self::Rejected { status, message } => (status, ErrorKind::Validation.as_str(), message),
            Self::Core(e) => {
                let kind = e.kind();
                let message = match &e {
                    Error::Persistence(source) => {
                        tracing::error!(error = %source, "storage failure");
                        "internal server error".to_string()
                    }
                    Error::ReceiptGenerationExhausted { .. } => {
                        tracing::error!(error = %e, "receipt generation failed");
                        e.to_string()
                    }
                    _ => e.to_string(),
                };
                (status_for(kind), kind.as_str(), message)
            }
        };
        (status, Json(json!({ "status": class, "message": message }))).into_response()
    }
}
