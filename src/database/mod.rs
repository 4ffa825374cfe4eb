use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

use crate::assets::{Migration, MigrationAssets};
use crate::config::DatabaseConfig;

pub mod categories;
pub mod items;

#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub fn pool(&self) -> Pool<Sqlite> {
        self.pool.clone()
    }

    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        Self::ensure_sqlite_parent_dir(&config.url)?;

        let options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("Invalid SQLite URL format: {}", config.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every pooled connection to an in-memory database gets its own
        // empty schema, so those URLs are clamped to a single connection.
        let max_connections = if config.url.contains(":memory:") {
            1
        } else {
            config.max_connections.unwrap_or(10)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database at '{}'", config.url))?;

        Ok(Self { pool })
    }

    /// Create the directory that will hold a file-backed SQLite database
    /// so that `create_if_missing` can succeed on a fresh checkout.
    fn ensure_sqlite_parent_dir(url: &str) -> Result<()> {
        // In-memory databases and URLs with explicit modes need no help
        if url.contains("mode=") || url.contains(":memory:") {
            debug!("SQLite URL needs no directory preparation: {}", url);
            return Ok(());
        }

        let file_path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        let path = std::path::Path::new(file_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create directory for SQLite database: {}",
                        parent.display()
                    )
                })?;
                info!("Created directory for SQLite database: {}", parent.display());
            }
        }

        Ok(())
    }

    /// Bring the schema up to date by applying any embedded migrations that
    /// have not run yet. Applied versions are tracked in `_schema_migrations`
    /// and skipped on subsequent startups.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _schema_migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                success BOOLEAN NOT NULL,
                checksum BLOB NOT NULL,
                execution_time BIGINT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for migration in MigrationAssets::migrations()? {
            let applied = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM _schema_migrations WHERE version = ? AND success = true",
            )
            .bind(migration.version)
            .fetch_one(&self.pool)
            .await?;

            if applied > 0 {
                debug!("Migration {} already applied", migration.name);
                continue;
            }

            self.apply_migration(&migration).await?;
        }

        Ok(())
    }

    /// Run one migration and record it, both inside a single transaction, so
    /// a failure leaves neither a half-applied schema nor a bookkeeping row.
    async fn apply_migration(&self, migration: &Migration) -> Result<()> {
        let start = std::time::Instant::now();
        let mut tx = self.pool.begin().await?;

        if let Err(e) = sqlx::query(&migration.sql).execute(&mut *tx).await {
            tx.rollback().await?;
            anyhow::bail!("Migration {} failed: {}", migration.name, e);
        }

        let execution_time = start.elapsed().as_millis() as i64;
        let checksum = Sha256::digest(migration.sql.as_bytes()).to_vec();

        sqlx::query(
            "INSERT INTO _schema_migrations (version, description, success, checksum, execution_time)
             VALUES (?, ?, true, ?, ?)",
        )
        .bind(migration.version)
        .bind(&migration.name)
        .bind(checksum)
        .bind(execution_time)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Applied migration: {} ({}ms)", migration.name, execution_time);
        Ok(())
    }
}
