//! In-memory item index
//!
//! Process-lifetime mirror of every persisted item, loaded once at startup
//! and appended to on each successful ingestion. All read endpoints are
//! answered from here without a storage round-trip. The sequence preserves
//! repository insertion order and is never re-sorted or deduplicated.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::Item;

#[derive(Clone)]
pub struct ItemIndex {
    items: Arc<RwLock<Vec<Item>>>,
}

impl ItemIndex {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replace the whole sequence with a freshly loaded one. Used at startup
    /// to warm the index from the repository.
    pub async fn replace_all(&self, items: Vec<Item>) {
        let mut guard = self.items.write().await;
        *guard = items;
    }

    /// Append a newly ingested item. Takes the exclusive writer so two
    /// concurrent ingestions cannot lose an element.
    pub async fn append(&self, item: Item) {
        let mut guard = self.items.write().await;
        guard.push(item);
    }

    pub async fn list_all(&self) -> Vec<Item> {
        let guard = self.items.read().await;
        guard.clone()
    }

    /// Items whose name contains `keyword` as a case-sensitive substring.
    /// The empty keyword matches everything. No tokenization, no ranking.
    pub async fn search(&self, keyword: &str) -> Vec<Item> {
        let guard = self.items.read().await;
        guard
            .iter()
            .filter(|item| item.name.contains(keyword))
            .cloned()
            .collect()
    }

    /// Linear scan by id. Absence is an explicit `None`, never a zero item.
    pub async fn get_by_id(&self, id: i64) -> Option<Item> {
        let guard = self.items.read().await;
        guard.iter().find(|item| item.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        let guard = self.items.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for ItemIndex {
    fn default() -> Self {
        Self::new()
    }
}
