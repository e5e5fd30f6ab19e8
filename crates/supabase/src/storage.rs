//! Client for the platform's object storage.
//!
//! Two operations: upload a binary object under a caller-generated path,
//! and derive the public URL for a stored object.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::instrument;

use crate::{SupabaseConfig, SupabaseError, error_for_response};

/// Client for the platform storage endpoints.
#[derive(Clone)]
pub struct StorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    base: String,
    api_key: String,
}

impl StorageClient {
    /// Create a new storage client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            inner: Arc::new(StorageClientInner {
                client: reqwest::Client::new(),
                base: format!("{}/storage/v1", config.url),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Upload `bytes` to `bucket` under `path`, replacing any existing
    /// object at that key.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the upload (bucket missing,
    /// key not allowed to write).
    #[instrument(skip(self, bytes), fields(bucket = %bucket, path = %path, size = bytes.len()))]
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!(
                "{}/object/{bucket}/{}",
                self.inner.base,
                encode_object_path(path)
            ))
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .header("x-upsert", "true")
            .header("Content-Type", content_type.to_string())
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }
        Ok(())
    }

    /// Public URL for an object in a public bucket.
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/public/{bucket}/{}",
            self.inner.base,
            encode_object_path(path)
        )
    }
}

/// Percent-encode each segment of an object path, keeping the separators.
fn encode_object_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> StorageClient {
        StorageClient::new(&SupabaseConfig {
            url: "https://abc.supabase.co".to_string(),
            api_key: SecretString::from("test-key"),
        })
    }

    #[test]
    fn test_public_url_shape() {
        let url = client().public_url("product-images", "products/123-lavender.png");
        assert_eq!(
            url,
            "https://abc.supabase.co/storage/v1/object/public/product-images/products/123-lavender.png"
        );
    }

    #[test]
    fn test_object_path_segments_are_encoded() {
        assert_eq!(
            encode_object_path("products/salt scrub.png"),
            "products/salt%20scrub.png"
        );
        // Separators survive encoding.
        assert_eq!(encode_object_path("a/b/c"), "a/b/c");
    }
}
