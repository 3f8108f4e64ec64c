use crate::{
    error::{AppResult, ValidationError},
    models::{NewPortfolio, PortfolioModel},
    services::{
        repository::DynRepository,
        storage::DynObjectStore,
        upload::{ImageUpload, UploadService},
    },
};
use regex::Regex;
use std::sync::LazyLock;
use validator::Validate;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,4}$").expect("valid email regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([0-9a-z.-]+)\.([a-z.]{2,6})([/A-Za-z0-9_.-]*)*/?$")
        .expect("valid url regex")
});

/// Raw fields of a portfolio submission, as read from the form.
#[derive(Debug, Clone, Default, Validate)]
pub struct SubmissionForm {
    #[validate(length(max = 254))]
    pub email: String,
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 2048))]
    pub url: String,
    pub image: Option<ImageUpload>,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

/// Check a submission in a fixed order, stopping at the first problem.
pub fn validate_submission(form: &SubmissionForm) -> Result<&ImageUpload, ValidationError> {
    if form.email.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail);
    }

    if form.name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }

    if form.url.trim().is_empty() {
        return Err(ValidationError::UrlRequired);
    }
    if !is_valid_url(&form.url) {
        return Err(ValidationError::InvalidUrl);
    }

    if let Err(errors) = form.validate() {
        let fields = errors.field_errors();
        let field = ["email", "name", "url"]
            .into_iter()
            .find(|f| fields.contains_key(*f))
            .unwrap_or("Field");
        return Err(ValidationError::TooLong(match field {
            "email" => "Email",
            "name" => "Name",
            "url" => "URL",
            other => other,
        }));
    }

    let image = form.image.as_ref().ok_or(ValidationError::ImageRequired)?;
    UploadService::validate(image)?;
    Ok(image)
}

pub struct SubmissionService {
    repo: DynRepository,
    store: DynObjectStore,
}

impl SubmissionService {
    pub fn new(repo: DynRepository, store: DynObjectStore) -> Self {
        Self { repo, store }
    }

    /// Validate, upload the image, then insert the portfolio row.
    ///
    /// Nothing is written when validation fails; an upload failure aborts
    /// before the insert.
    pub async fn submit(&self, form: SubmissionForm) -> AppResult<PortfolioModel> {
        validate_submission(&form)?;

        let SubmissionForm {
            email,
            name,
            url,
            image,
        } = form;
        let image = image.ok_or(ValidationError::ImageRequired)?;

        let image_url = UploadService::store(&self.store, image).await?;

        let portfolio = self
            .repo
            .insert_portfolio(NewPortfolio {
                email,
                name,
                url,
                image: image_url,
            })
            .await?;

        tracing::info!(id = %portfolio.id, name = %portfolio.name, "portfolio submitted");
        Ok(portfolio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::repository::InMemoryRepository;
    use crate::services::storage::InMemoryObjectStore;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;
    use std::sync::Arc;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn valid_form() -> SubmissionForm {
        SubmissionForm {
            email: "jane.doe@example.com".to_string(),
            name: "Jane Doe".to_string(),
            url: "https://janedoe.dev/work".to_string(),
            image: Some(ImageUpload {
                filename: "jane.png".to_string(),
                content_type: "image/png".to_string(),
                data: Bytes::from_static(PNG),
            }),
        }
    }

    fn service() -> (InMemoryRepository, InMemoryObjectStore, SubmissionService) {
        let repo = InMemoryRepository::new();
        let store = InMemoryObjectStore::new("https://cdn.example.com/images");
        let service = SubmissionService::new(Arc::new(repo.clone()), Arc::new(store.clone()));
        (repo, store, service)
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a.b-c_d@sub.example.io"));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@example.travel"));
        assert!(!is_valid_email("a+tag@example.com"));
    }

    #[test]
    fn url_pattern() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("example.com/portfolio/"));
        assert!(is_valid_url("http://my-site.co.uk/a/b.html"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("localhost"));
    }

    #[test]
    fn url_pattern_is_ascii_only() {
        assert!(is_valid_url("https://example.com/Some_Path-1.html"));
        assert!(!is_valid_url("https://example.com/café"));
        assert!(!is_valid_url("١٢٣.com"));
        assert!(!is_valid_url("example.com/作品"));
    }

    #[test]
    fn validation_order_short_circuits() {
        let mut form = SubmissionForm::default();
        assert_eq!(validate_submission(&form).unwrap_err(), ValidationError::EmailRequired);

        form.email = "bad-email".to_string();
        assert_eq!(validate_submission(&form).unwrap_err(), ValidationError::InvalidEmail);

        form.email = "ok@example.com".to_string();
        form.name = "   ".to_string();
        assert_eq!(validate_submission(&form).unwrap_err(), ValidationError::NameRequired);

        form.name = "Ok".to_string();
        form.url = " ".to_string();
        assert_eq!(validate_submission(&form).unwrap_err(), ValidationError::UrlRequired);

        form.url = "not a url".to_string();
        assert_eq!(validate_submission(&form).unwrap_err(), ValidationError::InvalidUrl);

        form.url = "ok.dev".to_string();
        assert_eq!(validate_submission(&form).unwrap_err(), ValidationError::ImageRequired);
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut form = valid_form();
        form.name = "x".repeat(101);
        assert_eq!(
            validate_submission(&form).unwrap_err(),
            ValidationError::TooLong("Name")
        );
    }

    #[tokio::test]
    async fn bad_email_writes_nothing() {
        let (repo, store, service) = service();
        let mut form = valid_form();
        form.email = "bad-email".to_string();

        let err = service.submit(form).await.unwrap_err();
        assert!(matches!(err, AppError::Submission(ValidationError::InvalidEmail)));
        assert!(store.objects().is_empty());
        assert!(repo.portfolios().is_empty());
    }

    #[tokio::test]
    async fn bad_url_writes_nothing() {
        let (repo, store, service) = service();
        let mut form = valid_form();
        form.url = "not a url".to_string();

        let err = service.submit(form).await.unwrap_err();
        assert!(matches!(err, AppError::Submission(ValidationError::InvalidUrl)));
        assert!(store.objects().is_empty());
        assert!(repo.portfolios().is_empty());
    }

    #[tokio::test]
    async fn missing_image_writes_nothing() {
        let (repo, store, service) = service();
        let mut form = valid_form();
        form.image = None;

        let err = service.submit(form).await.unwrap_err();
        assert!(matches!(err, AppError::Submission(ValidationError::ImageRequired)));
        assert!(store.objects().is_empty());
        assert!(repo.portfolios().is_empty());
    }

    #[tokio::test]
    async fn valid_submission_uploads_once_and_inserts_once() {
        let (repo, store, service) = service();
        let started = Utc::now().fixed_offset();

        let portfolio = service.submit(valid_form()).await.unwrap();

        let objects = store.objects();
        assert_eq!(objects.len(), 1);
        assert!(objects[0].key.ends_with("-jane.png"));
        assert_eq!(objects[0].content_type, "image/png");
        assert_eq!(objects[0].size, PNG.len());

        let rows = repo.portfolios();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], portfolio);
        assert!(!portfolio.published);
        assert!(portfolio.created_at >= started);
        assert_eq!(portfolio.email, "jane.doe@example.com");
        assert_eq!(
            portfolio.image,
            format!("https://cdn.example.com/images/{}", objects[0].key)
        );
    }

    struct FailingStore;

    #[async_trait]
    impl crate::services::storage::ObjectStore for FailingStore {
        async fn put(&self, _: &str, _: Bytes, _: &str) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("bucket unavailable"))
        }
    }

    #[tokio::test]
    async fn storage_failure_aborts_before_insert() {
        let repo = InMemoryRepository::new();
        let service = SubmissionService::new(Arc::new(repo.clone()), Arc::new(FailingStore));

        let err = service.submit(valid_form()).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert!(repo.portfolios().is_empty());
    }
}
