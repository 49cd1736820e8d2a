//! Public area reference data.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::db::AreaRepository;
use crate::error::Result;
use crate::models::Area;
use crate::state::AppState;

use super::success;

/// Build the public areas router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/areas", get(list_areas))
}

#[derive(Debug, Serialize)]
struct AreasData {
    areas: Vec<Area>,
}

/// List active areas in display order.
async fn list_areas(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let areas = AreaRepository::new(state.db()).list_active().await?;
    Ok(success(AreasData { areas }))
}
