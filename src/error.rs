use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// User-facing reasons a portfolio submission is rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required!")]
    EmailRequired,
    #[error("Invalid email!")]
    InvalidEmail,
    #[error("Name is required!")]
    NameRequired,
    #[error("URL is required!")]
    UrlRequired,
    #[error("Invalid URL!")]
    InvalidUrl,
    #[error("{0} is too long!")]
    TooLong(&'static str),
    #[error("Image is required!")]
    ImageRequired,
    #[error("Image must be 5 MB or smaller!")]
    ImageTooLarge,
    #[error("Image must be a JPEG, PNG, GIF or WebP file!")]
    UnsupportedImage,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Object storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Submission rejected: {0}")]
    Submission(#[from] ValidationError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Payload too large")]
    PayloadTooLarge,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl utoipa::ToSchema for AppError {
    fn name() -> std::borrow::Cow<'static, str> {
        "ErrorResponse".into()
    }
}

impl utoipa::PartialSchema for AppError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Object storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image upload failed".to_string(),
                )
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Submission(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "File too large".to_string(),
            ),
        };

        let body = json!({
            "error": error_message,
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
