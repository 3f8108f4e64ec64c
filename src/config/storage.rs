use super::require_env;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::env;

/// Connection settings for the S3-compatible bucket that hosts portfolio images.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint: String,
    /// Base URL under which uploaded keys are publicly readable.
    pub public_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl StorageConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bucket: require_env("S3_BUCKET")?,
            endpoint: require_env("S3_ENDPOINT")?,
            public_url: require_env("S3_PUBLIC_URL")?,
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
        })
    }
}

pub async fn get_s3_client(config: &StorageConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "gemfolio-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&config.endpoint)
        .load()
        .await;

    // Path-style addressing keeps MinIO and Supabase-style endpoints working.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
