// src/error.rs
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The question does not exist or is not published yet.
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            AppError::Invalid(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": message })),
            )
                .into_response(),
            err => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Admin endpoints answer in JSON, including their not-found case.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "question not found" })),
            )
                .into_response(),
            err => err.into_response(),
        }
    }
}

const NOT_FOUND_PAGE: &str = include_str!("../templates/not_found.html");
