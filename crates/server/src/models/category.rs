//! Category model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hondana_core::CategoryId;

/// A legacy classification attached directly to a store via `category_id`.
///
/// Newer code paths prefer [`super::CategoryTag`]; categories remain both for
/// existing rows and for the public category filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
