//! Public category reference data.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::db::CategoryRepository;
use crate::error::Result;
use crate::models::Category;
use crate::state::AppState;

use super::success;

/// Build the public categories router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/categories", get(list_categories))
}

#[derive(Debug, Serialize)]
struct CategoriesData {
    categories: Vec<Category>,
}

/// List active categories in display order.
async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.db()).list_active().await?;
    Ok(success(CategoriesData { categories }))
}
