//! Object storage access for the retention sweeper.
//!
//! The sweep logic talks to storage through the [`ObjectStore`] trait so it
//! can run against an in-memory fake in tests. The production
//! implementation wraps the AWS S3 client and also works against
//! S3-compatible stores (MinIO, R2, DigitalOcean Spaces) via an endpoint
//! override.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{SweepError, SweepResult};

/// Page size requested from every listing call.
pub const LIST_PAGE_SIZE: i32 = 1_000;

/// Largest number of keys a single delete call may carry.
/// This is the S3 DeleteObjects protocol limit.
pub const MAX_DELETE_BATCH: usize = 1_000;

/// One listed object, as reported by the backend.
///
/// Key and timestamp keep the wire model's optionality; the sweep skips
/// entries where either is absent.
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    pub key: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One page of listing results.
#[derive(Debug, Default)]
pub struct ObjectPage {
    pub entries: Vec<ObjectEntry>,
    /// Continuation token for the next page, present only when the listing
    /// was truncated.
    pub next_token: Option<String>,
}

/// Capability used by the sweep to list and delete objects.
///
/// Implementations must be `Send + Sync` to support async contexts.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of up to [`LIST_PAGE_SIZE`] objects under `prefix`,
    /// resuming from `token` when present.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<&str>,
    ) -> SweepResult<ObjectPage>;

    /// Delete up to [`MAX_DELETE_BATCH`] keys in one call.
    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> SweepResult<()>;
}

/// S3-backed [`ObjectStore`] implementation.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS environment (credential chain,
    /// region). `S3_ENDPOINT` and `S3_FORCE_PATH_STYLE` override the
    /// endpoint for S3-compatible stores.
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Ok(endpoint) = std::env::var("S3_ENDPOINT") {
            builder = builder.endpoint_url(endpoint);
        }
        if std::env::var("S3_FORCE_PATH_STYLE")
            .is_ok_and(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        {
            builder = builder.force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<&str>,
    ) -> SweepResult<ObjectPage> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(LIST_PAGE_SIZE);
        if let Some(token) = token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SweepError::Backend(e.to_string()))?;

        let entries = response
            .contents()
            .iter()
            .map(|object| ObjectEntry {
                key: object.key().map(str::to_string),
                last_modified: object
                    .last_modified()
                    .and_then(|ts| DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())),
            })
            .collect();

        let next_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        debug!(bucket, prefix, truncated = next_token.is_some(), "Listed object page");

        Ok(ObjectPage {
            entries,
            next_token,
        })
    }

    async fn delete_batch(&self, bucket: &str, keys: &[String]) -> SweepResult<()> {
        let objects = keys
            .iter()
            .map(|key| {
                aws_sdk_s3::types::ObjectIdentifier::builder()
                    .key(key)
                    .build()
                    .map_err(|e| SweepError::Backend(e.to_string()))
            })
            .collect::<SweepResult<Vec<_>>>()?;

        let delete = aws_sdk_s3::types::Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| SweepError::Backend(e.to_string()))?;

        self.client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| SweepError::Backend(e.to_string()))?;

        debug!(bucket, count = keys.len(), "Deleted object batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_store_implementations_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<S3ObjectStore>();
    }
}
