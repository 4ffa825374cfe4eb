use anyhow::{anyhow, Result};
use rust_embed::RustEmbed;

/// Embedded database migrations
#[derive(RustEmbed)]
#[folder = "src/database/migrations/"]
#[prefix = "migrations/"]
pub struct MigrationAssets;

/// One embedded migration, parsed from its `NNNN_description.sql` file.
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub sql: String,
}

impl MigrationAssets {
    /// All embedded migrations in version order.
    ///
    /// Every file must carry a numeric version prefix; apply order is defined
    /// by that prefix, so an unversioned file is a packaging error.
    pub fn migrations() -> Result<Vec<Migration>> {
        let mut migrations = Vec::new();

        for path in Self::iter() {
            let Some(file) = Self::get(&path) else {
                continue;
            };
            let name = path.strip_prefix("migrations/").unwrap_or(&path).to_string();
            let version = name
                .split('_')
                .next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| anyhow!("migration {name} lacks a numeric version prefix"))?;

            migrations.push(Migration {
                version,
                name,
                sql: String::from_utf8_lossy(&file.data).into_owned(),
            });
        }

        migrations.sort_by_key(|m| m.version);
        Ok(migrations)
    }
}
