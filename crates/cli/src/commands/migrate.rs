//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! ep-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! Admin migrations: `crates/admin/migrations/`

use thiserror::Error;
use tracing::info;

use extended_products_admin::config::{AdminConfig, ConfigError};
use extended_products_admin::db;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run admin database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if no database is configured, the connection
/// fails, or a migration fails to apply.
pub async fn admin() -> Result<(), MigrationError> {
    let config = AdminConfig::from_env()?;
    let database_url = config.require_database_url()?;

    info!("Connecting to admin database...");
    let pool = db::create_pool(database_url).await?;

    info!("Running admin migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    info!("Admin migrations complete!");
    Ok(())
}
