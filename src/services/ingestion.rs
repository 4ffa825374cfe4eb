//! Item ingestion service
//!
//! One submitted item flows through here as a single logical unit: derive
//! the content-addressed filename, persist the image blob, resolve the
//! category, insert the row, and append to the in-memory index. Any step
//! failing aborts the call and surfaces the cause wrapped with the
//! operation's name.

use tracing::info;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::image_store::ImageStore;
use crate::index::ItemIndex;
use crate::models::{Item, ItemCreateRequest};

#[derive(Clone)]
pub struct IngestionService {
    database: Database,
    image_store: ImageStore,
    index: ItemIndex,
}

impl IngestionService {
    pub fn new(database: Database, image_store: ImageStore, index: ItemIndex) -> Self {
        Self {
            database,
            image_store,
            index,
        }
    }

    /// Ingest a submitted item and return it with its assigned id.
    ///
    /// The image blob is written before the row insert: a failed insert then
    /// leaves only an idempotently re-writable file, never a row whose image
    /// cannot be served. Category resolution precedes the insert because the
    /// row carries the category id. Empty names, categories and payloads are
    /// accepted as-is.
    pub async fn ingest(&self, request: ItemCreateRequest) -> AppResult<Item> {
        let image_filename = ImageStore::derive_filename(&request.image_data);

        info!(
            "Receive item: {}, {}, {}",
            request.name, request.category, image_filename
        );

        self.image_store
            .save(&request.image_data)
            .await
            .map_err(AppError::ingestion)?;

        let category_id = self
            .database
            .resolve_or_create_category(&request.category)
            .await
            .map_err(AppError::ingestion)?;

        let id = self
            .database
            .insert_item(&request.name, category_id, &image_filename)
            .await
            .map_err(AppError::ingestion)?;

        let item = Item {
            id,
            name: request.name,
            category: request.category,
            image_filename,
        };

        self.index.append(item.clone()).await;

        Ok(item)
    }
}
