use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A marketplace listing as delivered to clients.
///
/// `category` always carries the resolved category name; the raw
/// `category_id` foreign key never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub image_filename: String,
}

/// A named grouping entity referenced by items. At most one row exists per
/// distinct name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Payload assembled from a `POST /items` submission.
///
/// Fields missing from the form default to empty values; the service is
/// deliberately permissive and stores them as-is.
#[derive(Debug, Clone, Default)]
pub struct ItemCreateRequest {
    pub name: String,
    pub category: String,
    pub image_data: Vec<u8>,
}

/// Message envelope used by write acknowledgements and error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Envelope for list and search responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}
