//! Area repository.

use serde::{Deserialize, Serialize};

use hondana_core::AreaId;

use crate::models::Area;

use super::client::Db;
use super::RepositoryError;

const TABLE: &str = "areas";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: AreaId,
}

/// Column values for an area insert.
#[derive(Debug, Serialize)]
pub struct NewAreaRow {
    pub name: String,
    pub prefecture: String,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Partial update for an area; unset fields keep their stored value.
#[derive(Debug, Default, Serialize)]
pub struct AreaChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Repository for area rows.
pub struct AreaRepository<'a> {
    db: &'a Db,
}

impl<'a> AreaRepository<'a> {
    /// Create a new area repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Active areas in display order (public reference data).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Area>, RepositoryError> {
        let rows = self
            .db
            .from(TABLE)
            .eq("is_active", true)
            .order_asc("sort_order")
            .fetch::<Area>()
            .await?;
        Ok(rows.rows)
    }

    /// All areas in display order (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Area>, RepositoryError> {
        let rows = self
            .db
            .from(TABLE)
            .order_asc("sort_order")
            .fetch::<Area>()
            .await?;
        Ok(rows.rows)
    }

    /// Fetch one area.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists.
    pub async fn get(&self, id: AreaId) -> Result<Area, RepositoryError> {
        self.db.from(TABLE).eq("id", id).fetch_one().await
    }

    /// Look up an area id by exact name, optionally excluding one row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn find_id_by_name(
        &self,
        name: &str,
        exclude: Option<AreaId>,
    ) -> Result<Option<AreaId>, RepositoryError> {
        let mut query = self.db.from(TABLE).select("id").eq("name", name);
        if let Some(id) = exclude {
            query = query.neq("id", id);
        }
        let rows = query.limit(1).fetch::<IdRow>().await?;
        Ok(rows.rows.into_iter().next().map(|row| row.id))
    }

    /// Insert a new area.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate name.
    pub async fn insert(&self, row: &NewAreaRow) -> Result<Area, RepositoryError> {
        self.db.from(TABLE).insert(row).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists and
    /// `RepositoryError::Conflict` on a duplicate name.
    pub async fn update(&self, id: AreaId, changes: &AreaChanges) -> Result<Area, RepositoryError> {
        self.db.from(TABLE).eq("id", id).update(changes).await
    }

    /// Delete an area row.
    ///
    /// The caller is responsible for the referential guard (no stores may
    /// still reference the area).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    pub async fn delete(&self, id: AreaId) -> Result<(), RepositoryError> {
        self.db.from(TABLE).eq("id", id).delete().await
    }
}
