use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::time::Duration;
use url::Url;

use crate::errors::AppError;

/// How photo URLs are produced for stored blobs. Both styles carry the blob
/// key in the URL path, so `key_for_url` works for either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStyle {
    /// Plain `https://{bucket}.s3.amazonaws.com/{key}` URL; the bucket must
    /// allow public reads.
    Public,
    /// Long-lived presigned GET URL.
    Signed,
}

impl UrlStyle {
    pub fn parse(value: &str) -> Option<UrlStyle> {
        match value {
            "public" => Some(UrlStyle::Public),
            "signed" => Some(UrlStyle::Signed),
            _ => None,
        }
    }
}

/// Blob-store surface for photo bytes. Injected as an `Arc<dyn BlobStore>`
/// so tests can substitute an in-memory fake.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// A retrievable URL for an existing key. The key must be derivable back
    /// from the returned URL via `key_for_url`.
    async fn url_for(&self, key: &str) -> Result<String, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Reverse of `url_for`. `None` means the URL was not produced by this
    /// store and no key can be derived.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    url_style: UrlStyle,
    signed_url_ttl: Duration,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: String, url_style: UrlStyle, signed_url_ttl: Duration) -> Self {
        Self {
            client,
            bucket,
            url_style,
            signed_url_ttl,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|err| AppError::Upload(format!("Failed to upload blob {}: {}", key, err)))?;

        Ok(())
    }

    async fn url_for(&self, key: &str) -> Result<String, AppError> {
        match self.url_style {
            UrlStyle::Public => Ok(format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)),
            UrlStyle::Signed => {
                let presigning_config = PresigningConfig::expires_in(self.signed_url_ttl)
                    .map_err(|err| AppError::Upload(format!("Invalid presigning config: {}", err)))?;

                let presigned = self
                    .client
                    .get_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .presigned(presigning_config)
                    .await
                    .map_err(|err| AppError::Upload(format!("Failed to presign blob {}: {}", key, err)))?;

                Ok(presigned.uri().to_string())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| AppError::Upload(format!("Failed to delete blob {}: {}", key, err)))?;

        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let path = parsed.path().trim_start_matches('/');

        // Path-style addressing prefixes the key with the bucket name.
        let key = path
            .strip_prefix(&format!("{}/", self.bucket))
            .unwrap_or(path);

        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}
