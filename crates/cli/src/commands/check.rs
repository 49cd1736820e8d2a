//! Configuration and connectivity diagnostics.

use tracing::info;

use hondana_server::config::DatabaseConfig;
use hondana_server::db::{Db, RepositoryError};

/// Tables reported by the check command.
const TABLES: &[&str] = &[
    "stores",
    "areas",
    "categories",
    "category_tags",
    "store_category_tags",
];

/// Run the check command: load configuration, probe the hosted database, and
/// report per-table row counts.
///
/// # Errors
///
/// Returns an error if configuration is missing/invalid or the hosted
/// database is unreachable.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    info!(url = %config.url, "Configuration loaded");

    let db = Db::new(&config);
    db.ping().await?;
    info!("Hosted database reachable");

    info!("Row counts");
    info!("==========");
    for &table in TABLES {
        match count(&db, table).await {
            Ok(total) => info!("  {table}: {total}"),
            Err(e) => info!("  {table}: unavailable ({e})"),
        }
    }

    Ok(())
}

/// Exact row count of one table via a limit-1 counted read.
async fn count(db: &Db, table: &'static str) -> Result<u64, RepositoryError> {
    let rows = db
        .from(table)
        .select("*")
        .limit(1)
        .count_exact()
        .fetch::<serde_json::Value>()
        .await?;
    Ok(rows.total.unwrap_or(rows.rows.len() as u64))
}
