//! Admin category tag management.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use hondana_core::CategoryTagId;

use crate::db::category_tags::{CategoryTagChanges, NewCategoryTagRow};
use crate::db::{CategoryTagRepository, RepositoryError, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::CategoryTag;
use crate::routes::{ApiJson, success, success_message};
use crate::state::AppState;

/// Build the admin category tags router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/category-tags",
            get(list_category_tags).post(create_category_tag),
        )
        .route(
            "/api/admin/category-tags/{id}",
            get(get_category_tag)
                .patch(update_category_tag)
                .delete(delete_category_tag),
        )
}

/// Request body for creating a category tag.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryTagRequest {
    pub name: String,
    pub display_name: String,
}

/// Request body for updating a category tag (the edit form always submits the
/// full field set).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryTagRequest {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
struct CategoryTagsData {
    category_tags: Vec<CategoryTag>,
}

#[derive(Debug, Serialize)]
struct CategoryTagData {
    category_tag: CategoryTag,
}

fn parse_tag_id(id: &str) -> Result<CategoryTagId> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid category tag ID".to_string()))
}

fn tag_not_found(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Category tag not found".to_string()),
        e => AppError::Database(e),
    }
}

/// List every tag in name order.
async fn list_category_tags(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let category_tags = CategoryTagRepository::new(state.db()).list_all().await?;
    Ok(success(CategoryTagsData { category_tags }))
}

/// Create a tag.
async fn create_category_tag(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateCategoryTagRequest>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim().to_string();
    let display_name = body.display_name.trim().to_string();
    if name.is_empty() || display_name.is_empty() {
        return Err(AppError::Validation(
            "Required fields are missing".to_string(),
        ));
    }

    let tags = CategoryTagRepository::new(state.db());
    if tags.find_id_by_name(&name, None).await?.is_some() {
        return Err(AppError::Duplicate(
            "This category tag name is already registered".to_string(),
        ));
    }

    let category_tag = tags
        .insert(&NewCategoryTagRow {
            name,
            display_name,
            is_active: true,
        })
        .await?;

    tracing::info!(category_tag_id = %category_tag.id, "category tag created");
    Ok((
        StatusCode::CREATED,
        success(CategoryTagData { category_tag }),
    ))
}

/// Fetch one tag.
async fn get_category_tag(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_tag_id(&id)?;
    let category_tag = CategoryTagRepository::new(state.db())
        .get(id)
        .await
        .map_err(tag_not_found)?;
    Ok(success(CategoryTagData { category_tag }))
}

/// Rewrite a tag.
async fn update_category_tag(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateCategoryTagRequest>,
) -> Result<impl IntoResponse> {
    let id = parse_tag_id(&id)?;
    let name = body.name.trim().to_string();
    let display_name = body.display_name.trim().to_string();
    if name.is_empty() || display_name.is_empty() {
        return Err(AppError::Validation(
            "Required fields are missing".to_string(),
        ));
    }

    let tags = CategoryTagRepository::new(state.db());
    let existing = tags.get(id).await.map_err(tag_not_found)?;

    if name != existing.name && tags.find_id_by_name(&name, Some(id)).await?.is_some() {
        return Err(AppError::Duplicate(
            "This category tag name is already registered".to_string(),
        ));
    }

    let category_tag = tags
        .update(
            id,
            &CategoryTagChanges {
                name,
                display_name,
                is_active: body.is_active.unwrap_or(true),
            },
        )
        .await
        .map_err(tag_not_found)?;

    tracing::info!(category_tag_id = %id, "category tag updated");
    Ok(success(CategoryTagData { category_tag }))
}

/// Delete a tag unless a store still carries it.
async fn delete_category_tag(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_tag_id(&id)?;
    let tags = CategoryTagRepository::new(state.db());

    match tags.get(id).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound("Category tag not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    if StoreRepository::new(state.db()).any_tagged_with(id).await? {
        return Err(AppError::RelatedData(
            "This category tag cannot be deleted because stores are using it".to_string(),
        ));
    }

    tags.delete(id).await?;

    tracing::info!(category_tag_id = %id, "category tag deleted");
    Ok(success_message("Category tag deleted"))
}
