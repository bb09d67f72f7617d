//! Print a product's decoded extended attributes.

use serde::Serialize;

use extended_products_admin::config::AdminConfig;
use extended_products_admin::db::{self, PgProductStore};
use extended_products_admin::store::ProductStore;
use extended_products_core::{Availability, ExtendedAttributes, ProductId, decode};
use extended_products_core::codec::DEFAULT_HIDDEN_KEYS;

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    id: &'a ProductId,
    title: &'a str,
    state: Availability,
    attributes: ExtendedAttributes,
}

/// Fetch a product and print its extended attributes as JSON.
///
/// # Errors
///
/// Returns an error if the product ID is empty, no database is configured,
/// or the product cannot be loaded.
pub async fn product(product_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::parse(product_id)?;

    let config = AdminConfig::from_env()?;
    let pool = db::create_pool(config.require_database_url()?).await?;
    let store = PgProductStore::new(pool);

    let product = store.get_by_id(&id).await?;
    let output = ShowOutput {
        id: &product.id,
        title: &product.title,
        state: product.availability(),
        attributes: decode(
            product.description.as_deref(),
            product.metadata.as_ref(),
            DEFAULT_HIDDEN_KEYS,
        ),
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}
