use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One offending field in a rejected request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn body(msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: vec!["body".into()],
            msg: msg.into(),
            kind,
        }
    }

    pub fn field(field: &str, msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: vec!["body".into(), field.to_string()],
            msg: msg.into(),
            kind,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("request validation failed ({} field errors)", .0.len())]
    Validation(Vec<FieldError>),

    /// The body could not be read at all (too large, aborted stream).
    #[error("{detail}")]
    BodyRejected { status: StatusCode, detail: String },

    #[error("store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": detail }))).into_response()
            }
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            AppError::BodyRejected { status, detail } => {
                (status, Json(json!({ "detail": detail }))).into_response()
            }
            AppError::Store(e) => {
                error!(error = %format!("{e:#}"), "unhandled store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
