//! Seed the product store from a YAML file.
//!
//! The file holds a `products` list in the same shape the store returns:
//!
//! ```yaml
//! products:
//!   - id: prod_pistachio
//!     title: Roasted pistachio
//!     description: Salted, in shell
//!     metadata:
//!       visitsCount: 12
//!     variants:
//!       - id: var_pistachio_250
//!         title: 250 g
//!         inventory_quantity: 40
//! ```
//!
//! Existing products with the same ID are replaced, metadata included.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use extended_products_admin::config::AdminConfig;
use extended_products_admin::db::{self, PgProductStore};
use extended_products_core::Product;

/// Top-level layout of a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<Product>,
}

/// Check a seed file for problems that would fail part-way through seeding.
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut product_ids = HashSet::new();
    let mut variant_ids = HashSet::new();

    for product in &seed.products {
        if !product_ids.insert(product.id.as_str()) {
            errors.push(format!("duplicate product id {}", product.id));
        }
        if product.title.trim().is_empty() {
            errors.push(format!("product {} has an empty title", product.id));
        }
        for variant in &product.variants {
            if !variant_ids.insert(variant.id.as_str()) {
                errors.push(format!("duplicate variant id {}", variant.id));
            }
        }
    }

    errors
}

/// Upsert every product in a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database operation fails.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    info!(products = seed.products.len(), "Parsed seed file");

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let config = AdminConfig::from_env()?;
    let pool = db::create_pool(config.require_database_url()?).await?;
    info!("Connected to database");

    let store = PgProductStore::new(pool);
    for product in &seed.products {
        store.upsert(product).await?;
        info!(product_id = %product.id, "Upserted product");
    }

    info!("Seeding complete! {} products written", seed.products.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use extended_products_core::{Availability, ExtendedProduct};

    use super::*;

    const SAMPLE: &str = include_str!("../../data/sample_products.yaml");

    #[test]
    fn test_sample_file_parses_and_validates() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert!(!seed.products.is_empty());
        assert!(validate(&seed).is_empty());

        let first = ExtendedProduct::from(seed.products[0].clone());
        assert_eq!(first.state, Availability::Available);
        assert_eq!(first.videos.len(), 2);
    }

    #[test]
    fn test_validate_reports_duplicates() {
        let seed: SeedFile = serde_yaml::from_str(
            r"
products:
  - id: prod_1
    title: Walnut
    variants:
      - { id: var_1, title: 100 g, inventory_quantity: 1 }
  - id: prod_1
    title: ' '
    variants:
      - { id: var_1, title: 200 g, inventory_quantity: 0 }
",
        )
        .unwrap();

        let errors = validate(&seed);
        assert_eq!(
            errors,
            vec![
                "duplicate product id prod_1".to_string(),
                "product prod_1 has an empty title".to_string(),
                "duplicate variant id var_1".to_string(),
            ]
        );
    }
}
