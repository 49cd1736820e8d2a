//! Admin resource handlers (session required).

pub mod areas;
pub mod categories;
pub mod category_tags;
pub mod stores;

use axum::Router;

use crate::state::AppState;

/// Build the admin resources router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(stores::router())
        .merge(areas::router())
        .merge(categories::router())
        .merge(category_tags::router())
}

/// Normalize a submitted link or free-text field: trim, map empty to `None`.
pub(crate) fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
