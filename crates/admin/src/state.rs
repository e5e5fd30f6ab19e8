//! Application state shared across handlers.

use std::sync::Arc;

use dimakatso_supabase::{AuthClient, DataClient, StorageClient};

use crate::config::AdminConfig;

/// Storage bucket holding product images.
pub const PRODUCT_IMAGE_BUCKET: &str = "product-images";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the platform clients and configuration. All
/// data calls from this binary run under the service role key.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    auth: AuthClient,
    data: DataClient,
    storage: StorageClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let auth = AuthClient::new(&config.supabase);
        let data = DataClient::new(&config.supabase);
        let storage = StorageClient::new(&config.supabase);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                data,
                storage,
            }),
        }
    }

    /// Get a reference to the back-office configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the platform auth client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the platform data client.
    #[must_use]
    pub fn data(&self) -> &DataClient {
        &self.inner.data
    }

    /// Get a reference to the platform storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }
}
