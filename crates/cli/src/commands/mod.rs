//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use estore_storefront::config::StorefrontConfig;
use estore_storefront::db;
use sqlx::PgPool;
use tracing::info;

/// Connect to the storefront database named by the environment.
async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    Ok(pool)
}
