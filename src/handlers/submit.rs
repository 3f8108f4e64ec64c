use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::services::repository::DynRepository;
use crate::services::storage::DynObjectStore;
use crate::services::submission::{SubmissionForm, SubmissionService};
use crate::services::upload::ImageUpload;
use crate::views;
use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    response::{Html, IntoResponse},
    Extension,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionResponse {
    /// ID of the stored portfolio
    pub id: Uuid,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("Failed to read upload: {}", e))
    }
}

/// Collect the submission fields; an `img` part without a filename or data is no file.
async fn read_submission(mut multipart: Multipart) -> AppResult<SubmissionForm> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "email" => form.email = field.text().await.map_err(multipart_error)?,
            "name" => form.name = field.text().await.map_err(multipart_error)?,
            "url" => form.url = field.text().await.map_err(multipart_error)?,
            "img" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;

                if !filename.is_empty() && !data.is_empty() {
                    form.image = Some(ImageUpload {
                        filename,
                        content_type,
                        data,
                    });
                }
            }
            other => tracing::debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    Ok(form)
}

/// GET /submit
pub async fn show_submit_form() -> AppResult<Html<String>> {
    Ok(Html(views::render_submit_page()?))
}

#[utoipa::path(
    post,
    path = "/submit",
    request_body(content_type = "multipart/form-data", description = "Fields: email, name, url, img (file)"),
    responses(
        (status = 201, description = "Portfolio submitted", body = SubmissionResponse),
        (status = 400, description = "Validation failed", body = crate::error::AppError),
        (status = 413, description = "Image too large", body = crate::error::AppError),
    ),
    tag = "portfolios"
)]
pub async fn submit_portfolio(
    Extension(repo): Extension<DynRepository>,
    Extension(store): Extension<DynObjectStore>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_submission(multipart).await?;
    let portfolio = SubmissionService::new(repo, store).submit(form).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(SubmissionResponse { id: portfolio.id }),
    ))
}
