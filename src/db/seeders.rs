//! Starter catalog data.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Classifications a fresh dealership starts with
const DEFAULT_CLASSIFICATIONS: &[&str] = &["Custom", "Sedan", "Sport", "SUV", "Truck"];

/// `app_meta` key recording that the catalog was seeded
const SEEDED_KEY: &str = "classifications_seeded";

/// Seed the default classifications once per database. A catalog that
/// already has classifications is only marked as seeded, and after that
/// deletions stick even if every classification goes.
pub async fn seed_classifications(pool: &SqlitePool) -> Result<()> {
    let seeded: Option<String> = sqlx::query_scalar("SELECT meta_value FROM app_meta WHERE meta_key = ?")
        .bind(SEEDED_KEY)
        .fetch_optional(pool)
        .await?;
    if seeded.is_some() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classification")
        .fetch_one(&mut *tx)
        .await?;
    if existing == 0 {
        info!("Seeding default classifications...");
        for name in DEFAULT_CLASSIFICATIONS {
            sqlx::query("INSERT OR IGNORE INTO classification (classification_name) VALUES (?)")
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }
        info!("Seeded {} classifications", DEFAULT_CLASSIFICATIONS.len());
    }

    sqlx::query("INSERT OR IGNORE INTO app_meta (meta_key, meta_value) VALUES (?, ?)")
        .bind(SEEDED_KEY)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
