//! Category repository.

use serde::{Deserialize, Serialize};

use hondana_core::CategoryId;

use crate::models::Category;

use super::client::Db;
use super::RepositoryError;

const TABLE: &str = "categories";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: CategoryId,
}

/// Column values for a category insert.
#[derive(Debug, Serialize)]
pub struct NewCategoryRow {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Partial update for a category; unset fields keep their stored value.
#[derive(Debug, Default, Serialize)]
pub struct CategoryChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Repository for category rows.
pub struct CategoryRepository<'a> {
    db: &'a Db,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Active categories in display order (public reference data).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = self
            .db
            .from(TABLE)
            .eq("is_active", true)
            .order_asc("sort_order")
            .fetch::<Category>()
            .await?;
        Ok(rows.rows)
    }

    /// All categories in display order (admin listing).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = self
            .db
            .from(TABLE)
            .order_asc("sort_order")
            .fetch::<Category>()
            .await?;
        Ok(rows.rows)
    }

    /// Fetch one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists.
    pub async fn get(&self, id: CategoryId) -> Result<Category, RepositoryError> {
        self.db.from(TABLE).eq("id", id).fetch_one().await
    }

    /// Look up a category id by exact name, optionally excluding one row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn find_id_by_name(
        &self,
        name: &str,
        exclude: Option<CategoryId>,
    ) -> Result<Option<CategoryId>, RepositoryError> {
        let mut query = self.db.from(TABLE).select("id").eq("name", name);
        if let Some(id) = exclude {
            query = query.neq("id", id);
        }
        let rows = query.limit(1).fetch::<IdRow>().await?;
        Ok(rows.rows.into_iter().next().map(|row| row.id))
    }

    /// Insert a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate name.
    pub async fn insert(&self, row: &NewCategoryRow) -> Result<Category, RepositoryError> {
        self.db.from(TABLE).insert(row).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists and
    /// `RepositoryError::Conflict` on a duplicate name.
    pub async fn update(
        &self,
        id: CategoryId,
        changes: &CategoryChanges,
    ) -> Result<Category, RepositoryError> {
        self.db.from(TABLE).eq("id", id).update(changes).await
    }

    /// Delete a category row.
    ///
    /// The caller is responsible for the referential guard (no stores may
    /// still reference the category).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        self.db.from(TABLE).eq("id", id).delete().await
    }
}
