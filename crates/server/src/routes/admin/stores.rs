//! Admin store management.

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use hondana_core::{AreaId, CategoryId, CategoryTagId, PageRequest, Pagination, StoreId};

use crate::db::stores::{NewStoreRow, StoreChanges};
use crate::db::{RepositoryError, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::Store;
use crate::routes::{ApiJson, success, success_message, success_with_message};
use crate::state::AppState;

use super::normalize_text;

/// Build the admin stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stores", get(list_stores).post(create_store))
        .route(
            "/api/admin/stores/{id}",
            get(get_store).patch(update_store).delete(delete_store),
        )
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default, deserialize_with = "crate::routes::empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "crate::routes::empty_as_none")]
    pub limit: Option<u32>,
}

/// Request body for creating a store.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStoreRequest {
    pub name: String,
    pub area_id: i32,
    pub category_id: i32,
    #[serde(default)]
    pub category_tag_ids: Option<Vec<i32>>,
    #[serde(default)]
    pub x_link: Option<String>,
    #[serde(default)]
    pub instagram_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub x_post_url: Option<String>,
    #[serde(default)]
    pub google_map_link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Request body for updating a store.
///
/// The edit form always submits the full field set; `category_tag_ids` is
/// only acted on when present (an empty list detaches every tag).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStoreRequest {
    pub name: String,
    pub area_id: i32,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub category_tag_ids: Option<Vec<i32>>,
    #[serde(default)]
    pub x_link: Option<String>,
    #[serde(default)]
    pub instagram_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub x_post_url: Option<String>,
    #[serde(default)]
    pub google_map_link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
struct StoresData {
    stores: Vec<Store>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct StoreData {
    store: Store,
}

fn parse_store_id(id: &str) -> Result<StoreId> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid store ID".to_string()))
}

fn tag_ids(raw: &[i32]) -> Vec<CategoryTagId> {
    raw.iter().copied().map(CategoryTagId::new).collect()
}

/// List every store, newest first.
async fn list_stores(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = PageRequest::new(query.page, query.limit);
    let (stores, total) = StoreRepository::new(state.db()).list(page).await?;

    Ok(success(StoresData {
        stores,
        pagination: Pagination::new(page, total),
    }))
}

/// Create a store, then attach any submitted tags.
async fn create_store(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateStoreRequest>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation(
            "Required fields are missing".to_string(),
        ));
    }

    let stores = StoreRepository::new(state.db());
    if stores.find_id_by_name(&name, None).await?.is_some() {
        return Err(AppError::Duplicate(
            "This store name is already registered".to_string(),
        ));
    }

    let row = NewStoreRow {
        name,
        area_id: AreaId::new(body.area_id),
        category_id: CategoryId::new(body.category_id),
        x_link: normalize_text(body.x_link),
        instagram_link: normalize_text(body.instagram_link),
        website_link: normalize_text(body.website_link),
        x_post_url: normalize_text(body.x_post_url),
        google_map_link: normalize_text(body.google_map_link),
        description: normalize_text(body.description),
        is_active: body.is_active.unwrap_or(true),
    };
    let store = stores.insert(&row).await?;

    // The join insert is a second, non-transactional write: a failure here is
    // logged and the store row stands.
    if let Some(raw_ids) = body.category_tag_ids {
        let ids = tag_ids(&raw_ids);
        if let Err(e) = stores.attach_tags(store.id, &ids).await {
            tracing::error!(
                store_id = %store.id,
                error = %e,
                "failed to attach category tags after store insert"
            );
        }
    }

    tracing::info!(store_id = %store.id, "store created");
    Ok((
        StatusCode::CREATED,
        success_with_message(StoreData { store }, "Store registered"),
    ))
}

/// Fetch one store with its tags.
async fn get_store(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_store_id(&id)?;
    let store = StoreRepository::new(state.db())
        .get(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Store not found".to_string()),
            e => AppError::Database(e),
        })?;

    Ok(success(StoreData { store }))
}

/// Update a store and, when submitted, replace its tag set.
async fn update_store(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateStoreRequest>,
) -> Result<impl IntoResponse> {
    let id = parse_store_id(&id)?;
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation(
            "Required fields are missing".to_string(),
        ));
    }

    let stores = StoreRepository::new(state.db());
    let existing = stores.get(id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Store not found".to_string()),
        e => AppError::Database(e),
    })?;

    if name != existing.name
        && stores.find_id_by_name(&name, Some(id)).await?.is_some()
    {
        return Err(AppError::Duplicate(
            "This store name is already registered".to_string(),
        ));
    }

    let changes = StoreChanges {
        name,
        area_id: AreaId::new(body.area_id),
        category_id: body.category_id.map(CategoryId::new),
        x_link: normalize_text(body.x_link),
        instagram_link: normalize_text(body.instagram_link),
        website_link: normalize_text(body.website_link),
        x_post_url: normalize_text(body.x_post_url),
        google_map_link: normalize_text(body.google_map_link),
        description: normalize_text(body.description),
        is_active: body.is_active.unwrap_or(true),
        updated_at: Utc::now(),
    };
    let store = stores.update(id, &changes).await?;

    if let Some(raw_ids) = body.category_tag_ids {
        stores.replace_tags(id, &tag_ids(&raw_ids)).await?;
    }

    tracing::info!(store_id = %id, "store updated");
    Ok(success(StoreData { store }))
}

/// Delete a store and its join rows.
async fn delete_store(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_store_id(&id)?;
    let stores = StoreRepository::new(state.db());

    match stores.get(id).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound("Store not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    stores.delete(id).await?;

    tracing::info!(store_id = %id, "store deleted");
    Ok(success_message("Store deleted"))
}
