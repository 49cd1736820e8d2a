//! Public category tag reference data.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::db::CategoryTagRepository;
use crate::error::Result;
use crate::models::CategoryTag;
use crate::state::AppState;

use super::success;

/// Build the public category tags router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/category-tags", get(list_category_tags))
}

#[derive(Debug, Serialize)]
struct CategoryTagsData {
    category_tags: Vec<CategoryTag>,
}

/// List active tags in name order.
async fn list_category_tags(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let category_tags = CategoryTagRepository::new(state.db()).list_active().await?;
    Ok(success(CategoryTagsData { category_tags }))
}
