use crate::error::{AppError, AppResult, ValidationError};
use crate::services::storage::DynObjectStore;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use bytes::Bytes;
use chrono::Utc;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5 MB
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// An image part taken from a submission form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Validate file magic bytes match the declared content type.
fn validate_magic_bytes(data: &[u8], content_type: &str) -> bool {
    match content_type {
        "image/jpeg" => data.len() >= 3 && data[..3] == [0xFF, 0xD8, 0xFF],
        "image/png" => data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47],
        "image/gif" => data.len() >= 4 && data[..4] == [0x47, 0x49, 0x46, 0x38],
        "image/webp" => {
            data.len() >= 12
                && data[..4] == [0x52, 0x49, 0x46, 0x46]
                && data[8..12] == [0x57, 0x45, 0x42, 0x50]
        }
        _ => false,
    }
}

/// Keep only characters that are safe in an object key and a URL path.
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.trim_matches(['-', '.']).is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

fn random_token() -> AppResult<String> {
    let mut buf = [0u8; 9];
    getrandom::getrandom(&mut buf)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("random token: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Object key `{unix_millis}-{token}-{filename}`.
pub fn object_key(filename: &str) -> AppResult<String> {
    Ok(format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        random_token()?,
        sanitize_filename(filename)
    ))
}

pub struct UploadService;

impl UploadService {
    pub fn validate(image: &ImageUpload) -> Result<(), ValidationError> {
        if image.data.len() > MAX_FILE_SIZE {
            return Err(ValidationError::ImageTooLarge);
        }

        if !ALLOWED_CONTENT_TYPES.contains(&image.content_type.as_str()) {
            return Err(ValidationError::UnsupportedImage);
        }

        if !validate_magic_bytes(&image.data, &image.content_type) {
            return Err(ValidationError::UnsupportedImage);
        }

        Ok(())
    }

    /// Upload a validated image and return its public URL.
    pub async fn store(store: &DynObjectStore, image: ImageUpload) -> AppResult<String> {
        let key = object_key(&image.filename)?;
        store
            .put(&key, image.data, &image.content_type)
            .await
            .map_err(AppError::Storage)
    }
}
