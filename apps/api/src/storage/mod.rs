//! Blob storage for uploaded files.
//!
//! `AppState` carries an `Arc<dyn BlobStore>`; production uses `S3BlobStore`.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

pub const REGION: &str = "us-east-1";
pub const BUCKET_NAME: &str = "hrbotresumestorage";

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), AppError>;

    /// Public URL of `key`. Deterministic; does not check that the object exists.
    fn public_url(&self, key: &str) -> String;
}

/// Virtual-hosted-style public URL for an object.
pub fn s3_public_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

#[derive(Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

/// Keeps the SDK error's full source chain. The `Storage error:` prefix comes from `AppError`.
fn storage_error<E: std::error::Error>(e: E) -> AppError {
    AppError::Storage(aws_sdk_s3::error::DisplayErrorContext(e).to_string())
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), AppError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(storage_error)?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        s3_public_url(&self.bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_template() {
        assert_eq!(
            s3_public_url(BUCKET_NAME, "0b6f.pdf"),
            "https://hrbotresumestorage.s3.amazonaws.com/0b6f.pdf"
        );
    }

    #[test]
    fn test_storage_error_is_prefixed_once() {
        let err = storage_error(std::io::Error::new(
            std::io::ErrorKind::Other,
            "access denied",
        ));
        let message = err.to_string();
        assert!(message.starts_with("Storage error: access denied"), "{message}");
        assert_eq!(message.matches("Storage error").count(), 1);
    }
}
