//! Admin category management.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use hondana_core::CategoryId;

use crate::db::categories::{CategoryChanges, NewCategoryRow};
use crate::db::{CategoryRepository, RepositoryError, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::Category;
use crate::routes::{ApiJson, success, success_message, success_with_message};
use crate::state::AppState;

use super::normalize_text;

/// Build the admin categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/admin/categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Request body for updating a category; absent fields keep their stored
/// value. Submitting an empty `description` clears it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
struct CategoriesData {
    categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
struct CategoryData {
    category: Category,
}

fn parse_category_id(id: &str) -> Result<CategoryId> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid category ID".to_string()))
}

fn category_not_found(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Category not found".to_string()),
        e => AppError::Database(e),
    }
}

/// List every category in display order.
async fn list_categories(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.db()).list_all().await?;
    Ok(success(CategoriesData { categories }))
}

/// Create a category.
async fn create_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim().to_string();
    let display_name = body.display_name.trim().to_string();
    if name.is_empty() || display_name.is_empty() {
        return Err(AppError::Validation(
            "Required fields are missing".to_string(),
        ));
    }

    let categories = CategoryRepository::new(state.db());
    if categories.find_id_by_name(&name, None).await?.is_some() {
        return Err(AppError::Duplicate(
            "This category name is already registered".to_string(),
        ));
    }

    let category = categories
        .insert(&NewCategoryRow {
            name,
            display_name,
            description: normalize_text(body.description),
            sort_order: body.sort_order.unwrap_or(0),
            is_active: body.is_active.unwrap_or(true),
        })
        .await?;

    tracing::info!(category_id = %category.id, "category created");
    Ok((
        StatusCode::CREATED,
        success_with_message(CategoryData { category }, "Category registered"),
    ))
}

/// Fetch one category.
async fn get_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_category_id(&id)?;
    let category = CategoryRepository::new(state.db())
        .get(id)
        .await
        .map_err(category_not_found)?;
    Ok(success(CategoryData { category }))
}

/// Apply a partial update to a category.
async fn update_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateCategoryRequest>,
) -> Result<impl IntoResponse> {
    let id = parse_category_id(&id)?;
    let categories = CategoryRepository::new(state.db());

    let name = match body.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation(
                    "Required fields are missing".to_string(),
                ));
            }
            if categories.find_id_by_name(&name, Some(id)).await?.is_some() {
                return Err(AppError::Duplicate(
                    "This category name is already registered".to_string(),
                ));
            }
            Some(name)
        }
        None => None,
    };

    let changes = CategoryChanges {
        name,
        display_name: body.display_name,
        description: body.description.map(|d| normalize_text(Some(d))),
        sort_order: body.sort_order,
        is_active: body.is_active,
    };

    let category = if is_empty_update(&changes) {
        categories.get(id).await.map_err(category_not_found)?
    } else {
        categories
            .update(id, &changes)
            .await
            .map_err(category_not_found)?
    };

    tracing::info!(category_id = %id, "category updated");
    Ok(success_with_message(
        CategoryData { category },
        "Category updated",
    ))
}

const fn is_empty_update(changes: &CategoryChanges) -> bool {
    changes.name.is_none()
        && changes.display_name.is_none()
        && changes.description.is_none()
        && changes.sort_order.is_none()
        && changes.is_active.is_none()
}

/// Delete a category unless a store still references it.
async fn delete_category(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_category_id(&id)?;

    if StoreRepository::new(state.db())
        .references_category(id)
        .await?
    {
        return Err(AppError::RelatedData(
            "This category cannot be deleted because stores are assigned to it".to_string(),
        ));
    }

    CategoryRepository::new(state.db()).delete(id).await?;

    tracing::info!(category_id = %id, "category deleted");
    Ok(success_message("Category deleted"))
}
