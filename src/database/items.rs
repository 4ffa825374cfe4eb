use super::Database;
use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::Item;
use tracing::debug;

impl Database {
    /// Load every item in primary-key order, with category ids resolved
    /// to their names.
    ///
    /// Ids are assigned monotonically at insert time, so this order is
    /// also ingestion order. Callers use it to seed the in-memory index.
    pub async fn load_all_items(&self) -> RepositoryResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT items.id, items.name, category.name AS category, items.image_filename
            FROM items
            JOIN category ON category.id = items.category_id
            ORDER BY items.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::query_failed("load_all", e.to_string()))?;

        debug!("Loaded {} items from database", items.len());
        Ok(items)
    }

    /// Insert an item row and return its assigned id.
    pub async fn insert_item(
        &self,
        name: &str,
        category_id: i64,
        image_filename: &str,
    ) -> RepositoryResult<i64> {
        let result = sqlx::query(
            "INSERT INTO items (name, category_id, image_filename) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(category_id)
        .bind(image_filename)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::query_failed("insert", e.to_string()))?;

        Ok(result.last_insert_rowid())
    }
}
