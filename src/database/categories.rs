use super::Database;
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::Category;
use tracing::debug;

impl Database {
    /// Resolve a category name to its id, creating the row on first use.
    ///
    /// Two ingestions may race on the same new name; the unique index on
    /// `category.name` makes one insert lose, and the loser re-reads the
    /// id the winner created. Names are matched exactly, so "Fruit" and
    /// "fruit" are distinct categories.
    pub async fn resolve_or_create_category(&self, name: &str) -> RepositoryResult<i64> {
        if let Some(category) = self.find_category(name).await? {
            return Ok(category.id);
        }

        let inserted = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await;

        match inserted {
            Ok(result) => {
                debug!("Created category {:?}", name);
                Ok(result.last_insert_rowid())
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                debug!("Category {:?} created concurrently, re-reading id", name);
                self.find_category(name).await?.map(|c| c.id).ok_or_else(|| {
                    RepositoryError::query_failed(
                        "resolve_or_create",
                        format!("category {name:?} missing after duplicate-key insert"),
                    )
                })
            }
            Err(e) => Err(RepositoryError::query_failed(
                "resolve_or_create",
                e.to_string(),
            )),
        }
    }

    async fn find_category(&self, name: &str) -> RepositoryResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::query_failed("resolve_or_create", e.to_string()))
    }
}
