//! Application state shared across handlers.

use std::sync::Arc;

use dimakatso_supabase::{AuthClient, DataClient};

use crate::config::StorefrontConfig;
use crate::services::catalog::CatalogService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the platform clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    auth: AuthClient,
    data: DataClient,
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let auth = AuthClient::new(&config.supabase);
        let data = DataClient::new(&config.supabase);
        let catalog = CatalogService::new(data.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                data,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
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

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
