//! Seed the starter catalog.

use rust_decimal::Decimal;

use dimakatso_supabase::DataClient;
use dimakatso_supabase::types::{ProductPatch, ProductRow};

/// The starter catalog inserted by `dk-cli seed`.
fn starter_catalog() -> Vec<ProductPatch> {
    vec![
        ProductPatch {
            name: "Lavender Dream Soak".to_string(),
            description: "Coarse salts infused with lavender buds for a calming evening ritual."
                .to_string(),
            price: Decimal::new(12_900, 2),
            category: "Bath Salts".to_string(),
            benefits: vec![
                "Calms the nervous system".to_string(),
                "Eases muscle tension".to_string(),
                "Gentle floral aroma".to_string(),
            ],
            is_special: true,
            is_active: true,
            image_url: None,
        },
        ProductPatch {
            name: "Eucalyptus Recovery Salts".to_string(),
            description: "A bracing post-workout soak with eucalyptus and rosemary oils."
                .to_string(),
            price: Decimal::new(11_500, 2),
            category: "Bath Salts".to_string(),
            benefits: vec![
                "Soothes tired muscles".to_string(),
                "Clears the airways".to_string(),
            ],
            is_special: false,
            is_active: true,
            image_url: None,
        },
        ProductPatch {
            name: "Rose Quartz Glow Salts".to_string(),
            description: "Pink Himalayan salts with rose petals and a touch of jojoba oil."
                .to_string(),
            price: Decimal::new(14_500, 2),
            category: "Bath Salts".to_string(),
            benefits: vec![
                "Softens and hydrates skin".to_string(),
                "Romantic rose aroma".to_string(),
            ],
            is_special: false,
            is_active: true,
            image_url: None,
        },
        ProductPatch {
            name: "Citrus Morning Scrub".to_string(),
            description: "Fine salt scrub with orange and grapefruit zest to start the day."
                .to_string(),
            price: Decimal::new(8_550, 2),
            category: "Scrubs".to_string(),
            benefits: vec![
                "Gently exfoliates".to_string(),
                "Bright citrus scent".to_string(),
            ],
            is_special: false,
            is_active: true,
            image_url: None,
        },
    ]
}

/// Insert the starter catalog.
///
/// # Errors
///
/// Returns an error when the environment is not configured or an insert is
/// rejected by the platform.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::service_config()?;
    let data = DataClient::new(&config);

    for patch in starter_catalog() {
        let created: ProductRow = data.insert("products", &patch, None).await?;
        tracing::info!(product_id = %created.id, name = %patch.name, "Seeded product");
    }

    tracing::info!("Starter catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_catalog_is_well_formed() {
        let catalog = starter_catalog();
        assert!(!catalog.is_empty());
        for product in &catalog {
            assert!(!product.name.is_empty());
            assert!(product.price > Decimal::ZERO);
            assert!(product.is_active);
        }
        // Exactly one launch special.
        assert_eq!(catalog.iter().filter(|p| p.is_special).count(), 1);
    }
}
