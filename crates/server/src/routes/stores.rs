//! Public store API handlers.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};

use hondana_core::{AreaId, CategoryId, PageRequest, Pagination, StoreId};

use crate::db::stores::StoreSearch;
use crate::db::{RepositoryError, StoreRepository};
use crate::error::{AppError, Result};
use crate::models::Store;
use crate::state::AppState;

use super::success;

/// Build the public stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stores", get(list_stores))
        .route("/api/stores/{id}", get(get_store))
}

/// Query parameters for the public store search.
///
/// Numeric parameters tolerate the empty strings HTML forms submit for
/// untouched fields.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StoreListQuery {
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub area_id: Option<i32>,
    /// Comma-separated list of area ids for a multi-area search.
    pub area_ids: Option<String>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub category_id: Option<i32>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "super::empty_as_none")]
    pub limit: Option<u32>,
}

impl StoreListQuery {
    /// Translate the raw query into repository filters.
    pub(crate) fn into_search(self) -> Result<(StoreSearch, PageRequest)> {
        let page = PageRequest::new(self.page, self.limit);
        let search = StoreSearch {
            area_id: self.area_id.map(AreaId::new),
            area_ids: parse_area_ids(self.area_ids.as_deref())?,
            category_id: self.category_id.map(CategoryId::new),
            search: self.search,
        };
        Ok((search, page))
    }
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

/// List active stores with filters and pagination.
async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<StoreListQuery>,
) -> Result<impl IntoResponse> {
    let (filter, page) = query.into_search()?;
    let (stores, total) = StoreRepository::new(state.db())
        .search_public(&filter, page)
        .await?;

    Ok(success(StoresData {
        stores,
        pagination: Pagination::new(page, total),
    }))
}

/// Fetch one active store with its tags.
async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: StoreId = id
        .parse()
        .map_err(|_| AppError::Validation("Invalid store ID".to_string()))?;

    let store = StoreRepository::new(state.db())
        .get_public(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::StoreNotFound,
            e => AppError::Database(e),
        })?;

    Ok(success(StoreData { store }))
}

/// Parse a comma-separated `area_ids` parameter.
fn parse_area_ids(raw: Option<&str>) -> Result<Vec<AreaId>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<AreaId>()
                .map_err(|_| AppError::Validation("Invalid area_ids".to_string()))
        })
        .collect()
}
