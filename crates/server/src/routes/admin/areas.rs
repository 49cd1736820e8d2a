//! Admin area management.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use hondana_core::AreaId;

use crate::db::areas::{AreaChanges, NewAreaRow};
use crate::db::{AreaRepository, RepositoryError, StoreRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::Area;
use crate::routes::{ApiJson, success, success_message, success_with_message};
use crate::state::AppState;

/// Build the admin areas router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/areas", get(list_areas).post(create_area))
        .route(
            "/api/admin/areas/{id}",
            get(get_area).patch(update_area).delete(delete_area),
        )
}

/// Request body for creating an area.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateAreaRequest {
    pub name: String,
    pub prefecture: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Request body for updating an area; absent fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAreaRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
struct AreasData {
    areas: Vec<Area>,
}

#[derive(Debug, Serialize)]
struct AreaData {
    area: Area,
}

fn parse_area_id(id: &str) -> Result<AreaId> {
    id.parse()
        .map_err(|_| AppError::Validation("Invalid area ID".to_string()))
}

fn area_not_found(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Area not found".to_string()),
        e => AppError::Database(e),
    }
}

/// List every area in display order.
async fn list_areas(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let areas = AreaRepository::new(state.db()).list_all().await?;
    Ok(success(AreasData { areas }))
}

/// Create an area.
async fn create_area(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateAreaRequest>,
) -> Result<impl IntoResponse> {
    let name = body.name.trim().to_string();
    let prefecture = body.prefecture.trim().to_string();
    if name.is_empty() || prefecture.is_empty() {
        return Err(AppError::Validation(
            "Required fields are missing".to_string(),
        ));
    }

    let areas = AreaRepository::new(state.db());
    if areas.find_id_by_name(&name, None).await?.is_some() {
        return Err(AppError::Duplicate(
            "This area name is already registered".to_string(),
        ));
    }

    let area = areas
        .insert(&NewAreaRow {
            name,
            prefecture,
            sort_order: body.sort_order.unwrap_or(0),
            is_active: body.is_active.unwrap_or(true),
        })
        .await?;

    tracing::info!(area_id = %area.id, "area created");
    Ok((
        StatusCode::CREATED,
        success_with_message(AreaData { area }, "Area registered"),
    ))
}

/// Fetch one area.
async fn get_area(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_area_id(&id)?;
    let area = AreaRepository::new(state.db())
        .get(id)
        .await
        .map_err(area_not_found)?;
    Ok(success(AreaData { area }))
}

/// Apply a partial update to an area.
async fn update_area(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateAreaRequest>,
) -> Result<impl IntoResponse> {
    let id = parse_area_id(&id)?;
    let areas = AreaRepository::new(state.db());

    let name = match body.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation(
                    "Required fields are missing".to_string(),
                ));
            }
            if areas.find_id_by_name(&name, Some(id)).await?.is_some() {
                return Err(AppError::Duplicate(
                    "This area name is already registered".to_string(),
                ));
            }
            Some(name)
        }
        None => None,
    };

    let changes = AreaChanges {
        name,
        prefecture: body.prefecture,
        sort_order: body.sort_order,
        is_active: body.is_active,
    };

    let area = if is_empty_update(&changes) {
        areas.get(id).await.map_err(area_not_found)?
    } else {
        areas.update(id, &changes).await.map_err(area_not_found)?
    };

    tracing::info!(area_id = %id, "area updated");
    Ok(success_with_message(AreaData { area }, "Area updated"))
}

const fn is_empty_update(changes: &AreaChanges) -> bool {
    changes.name.is_none()
        && changes.prefecture.is_none()
        && changes.sort_order.is_none()
        && changes.is_active.is_none()
}

/// Delete an area unless a store still references it.
async fn delete_area(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_area_id(&id)?;

    if StoreRepository::new(state.db()).references_area(id).await? {
        return Err(AppError::RelatedData(
            "This area cannot be deleted because stores are assigned to it".to_string(),
        ));
    }

    AreaRepository::new(state.db()).delete(id).await?;

    tracing::info!(area_id = %id, "area deleted");
    Ok(success_message("Area deleted"))
}
