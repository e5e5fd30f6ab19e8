//! Catalog loading and partitioning.
//!
//! Fetches active products newest-first and splits them into the specials
//! strip and the regular collection. Successful loads are cached for five
//! minutes; errors are never cached and never served from stale data - the
//! caller renders both collections empty instead.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use dimakatso_core::{Product, ProductId};
use dimakatso_supabase::{DataClient, SupabaseError, types::ProductRow};

/// The loaded catalog, partitioned for the home page.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Products flagged for the limited-time strip.
    pub specials: Vec<Product>,
    /// Everything else, newest first.
    pub regular: Vec<Product>,
}

const CATALOG_CACHE_KEY: &str = "catalog";
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Loads and caches the public catalog.
#[derive(Clone)]
pub struct CatalogService {
    data: DataClient,
    cache: Cache<&'static str, Catalog>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(data: DataClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(CACHE_TTL)
            .build();
        Self { data, cache }
    }

    /// Load the active catalog, newest first, partitioned into specials
    /// and regular products.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform call fails; nothing partial is
    /// returned and nothing stale is cached for the error case.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Catalog, SupabaseError> {
        if let Some(catalog) = self.cache.get(CATALOG_CACHE_KEY).await {
            debug!("Cache hit for catalog");
            return Ok(catalog);
        }

        let rows: Vec<ProductRow> = self
            .data
            .from("products")
            .eq("is_active", "true")
            .order_desc("created_at")
            .fetch()
            .await?;

        let catalog = partition(rows);
        self.cache.insert(CATALOG_CACHE_KEY, catalog.clone()).await;
        Ok(catalog)
    }

    /// Load one active product by id (detail page, add-to-cart).
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] for an unknown or inactive
    /// product.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, SupabaseError> {
        // Served from the cached catalog when possible; the row is small
        // but add-to-cart hits this on every click.
        if let Some(catalog) = self.cache.get(CATALOG_CACHE_KEY).await
            && let Some(product) = catalog
                .specials
                .iter()
                .chain(catalog.regular.iter())
                .find(|p| p.id == product_id)
        {
            return Ok(product.clone());
        }

        let row: ProductRow = self
            .data
            .from("products")
            .eq("id", product_id)
            .eq("is_active", "true")
            .fetch_one()
            .await?;

        Ok(row.into_product())
    }

    /// Drop the cached catalog (used by tests and future admin hooks).
    pub async fn invalidate(&self) {
        self.cache.invalidate(CATALOG_CACHE_KEY).await;
    }
}

/// Split rows into specials and regular products, preserving row order.
fn partition(rows: Vec<ProductRow>) -> Catalog {
    let mut catalog = Catalog::default();
    for row in rows {
        let product = row.into_product();
        if product.is_special {
            catalog.specials.push(product);
        } else {
            catalog.regular.push(product);
        }
    }
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(name: &str, special: bool) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: None,
            image_url: None,
            category: None,
            benefits: None,
            is_special: Some(special),
            is_active: Some(true),
            created_at: None,
        }
    }

    #[test]
    fn test_partition_splits_on_special_flag() {
        let catalog = partition(vec![
            row("Lavender Soak", true),
            row("Citrus Scrub", false),
            row("Rose Quartz Salts", true),
        ]);

        assert_eq!(catalog.specials.len(), 2);
        assert_eq!(catalog.regular.len(), 1);
        assert_eq!(catalog.specials[0].name, "Lavender Soak");
        assert_eq!(catalog.regular[0].name, "Citrus Scrub");
    }

    #[test]
    fn test_partition_of_nothing_is_empty_both_ways() {
        let catalog = partition(Vec::new());
        assert!(catalog.specials.is_empty());
        assert!(catalog.regular.is_empty());
    }
}
