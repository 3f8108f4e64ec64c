use crate::config::storage::StorageConfig;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::sync::{Arc, Mutex};

pub type DynObjectStore = Arc<dyn ObjectStore>;

/// Object-store side of the storage gateway: takes a finished byte body and a
/// destination key, returns a public URL for it.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String>;
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, config: &StorageConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        tracing::info!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, key);
        Ok(format!("{}/{}", self.public_url, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

/// Records uploads in memory and serves them from a fixed base URL.
#[derive(Clone)]
pub struct InMemoryObjectStore {
    base_url: String,
    objects: Arc<Mutex<Vec<StoredObject>>>,
}

impl InMemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<String> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(StoredObject {
                key: key.to_string(),
                content_type: content_type.to_string(),
                size: body.len(),
            });
        Ok(format!("{}/{}", self.base_url, key))
    }
}
