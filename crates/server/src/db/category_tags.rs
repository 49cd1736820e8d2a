//! Category tag repository.

use serde::{Deserialize, Serialize};

use hondana_core::CategoryTagId;

use crate::models::CategoryTag;

use super::client::Db;
use super::RepositoryError;

const TABLE: &str = "category_tags";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: CategoryTagId,
}

/// Column values for a category tag insert.
#[derive(Debug, Serialize)]
pub struct NewCategoryTagRow {
    pub name: String,
    pub display_name: String,
    pub is_active: bool,
}

/// Full rewrite of a category tag (the edit form always submits every field).
#[derive(Debug, Serialize)]
pub struct CategoryTagChanges {
    pub name: String,
    pub display_name: String,
    pub is_active: bool,
}

/// Repository for category tag rows.
pub struct CategoryTagRepository<'a> {
    db: &'a Db,
}

impl<'a> CategoryTagRepository<'a> {
    /// Create a new category tag repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Active tags in name order (public reference data).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<CategoryTag>, RepositoryError> {
        let rows = self
            .db
            .from(TABLE)
            .eq("is_active", true)
            .order_asc("name")
            .fetch::<CategoryTag>()
            .await?;
        Ok(rows.rows)
    }

    /// All tags in name order (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<CategoryTag>, RepositoryError> {
        let rows = self
            .db
            .from(TABLE)
            .order_asc("name")
            .fetch::<CategoryTag>()
            .await?;
        Ok(rows.rows)
    }

    /// Fetch one tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists.
    pub async fn get(&self, id: CategoryTagId) -> Result<CategoryTag, RepositoryError> {
        self.db.from(TABLE).eq("id", id).fetch_one().await
    }

    /// Look up a tag id by exact name, optionally excluding one row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn find_id_by_name(
        &self,
        name: &str,
        exclude: Option<CategoryTagId>,
    ) -> Result<Option<CategoryTagId>, RepositoryError> {
        let mut query = self.db.from(TABLE).select("id").eq("name", name);
        if let Some(id) = exclude {
            query = query.neq("id", id);
        }
        let rows = query.limit(1).fetch::<IdRow>().await?;
        Ok(rows.rows.into_iter().next().map(|row| row.id))
    }

    /// Insert a new tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate name.
    pub async fn insert(&self, row: &NewCategoryTagRow) -> Result<CategoryTag, RepositoryError> {
        self.db.from(TABLE).insert(row).await
    }

    /// Rewrite a tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists and
    /// `RepositoryError::Conflict` on a duplicate name.
    pub async fn update(
        &self,
        id: CategoryTagId,
        changes: &CategoryTagChanges,
    ) -> Result<CategoryTag, RepositoryError> {
        self.db.from(TABLE).eq("id", id).update(changes).await
    }

    /// Delete a tag row.
    ///
    /// The caller is responsible for the referential guard (no join rows may
    /// still reference the tag).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    pub async fn delete(&self, id: CategoryTagId) -> Result<(), RepositoryError> {
        self.db.from(TABLE).eq("id", id).delete().await
    }
}
