//! Area model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hondana_core::AreaId;

/// A named geographic area within a prefecture, used to locate stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub prefecture: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
