//! Category tag model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hondana_core::CategoryTagId;

/// A reusable label; a store may carry several via the join table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTag {
    pub id: CategoryTagId,
    pub name: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
