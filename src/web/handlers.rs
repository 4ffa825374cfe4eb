use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{Json, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{Item, ItemCreateRequest, ItemsResponse, MessageResponse};

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello, world!".to_string(),
    })
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn list_items(State(state): State<AppState>) -> Json<ItemsResponse> {
    Json(ItemsResponse {
        items: state.index.list_all().await,
    })
}

/// Accept a `multipart/form-data` submission with `name`, `category` and an
/// `image` file. Missing fields stay empty; the service stores them as-is.
pub async fn add_item(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let mut request = ItemCreateRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("invalid multipart form: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                request.name = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("invalid name field: {e}")))?;
            }
            "category" => {
                request.category = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("invalid category field: {e}")))?;
            }
            "image" => {
                request.image_data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("invalid image field: {e}")))?
                    .to_vec();
            }
            _ => {} // Ignore other fields
        }
    }

    let item = state.ingestion_service.ingest(request).await?;

    Ok(Json(MessageResponse {
        message: format!(
            "item received: {}, {}, {}",
            item.name, item.category, item.image_filename
        ),
    }))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Item>> {
    match state.index.get_by_id(id).await {
        Some(item) => Ok(Json(item)),
        None => Err(AppError::not_found("item", id.to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

pub async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<ItemsResponse> {
    let keyword = params.keyword.unwrap_or_default();
    Json(ItemsResponse {
        items: state.index.search(&keyword).await,
    })
}

/// Stream an image back. A name failing the serving rules is a 400; a name
/// with no file behind it serves `default.jpg` with a 200.
pub async fn get_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let path = state.image_store.resolve_for_serving(&filename).await?;
    let bytes = state.image_store.read(&path).await?;

    Ok(Response::builder()
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(bytes))
        .unwrap())
}
