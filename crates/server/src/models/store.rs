//! Store model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hondana_core::{AreaId, CategoryId, StoreId};

use super::CategoryTag;

/// A bookstore listed in the directory.
///
/// Carries both the legacy single category FK and the multi-tag set attached
/// through the `store_category_tags` join table. `category_tags` is only
/// populated on detail reads; list reads leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub area_id: AreaId,
    pub category_id: CategoryId,
    pub x_link: Option<String>,
    pub instagram_link: Option<String>,
    pub website_link: Option<String>,
    pub x_post_url: Option<String>,
    pub google_map_link: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub category_tags: Vec<CategoryTag>,
}
