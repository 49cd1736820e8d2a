//! Store repository: `stores` plus the `store_category_tags` join table.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hondana_core::{AreaId, CategoryId, CategoryTagId, PageRequest, StoreId};

use crate::models::{CategoryTag, Store};

use super::client::Db;
use super::RepositoryError;

const TABLE: &str = "stores";
const JOIN_TABLE: &str = "store_category_tags";

/// Embedded select pulling each store's tags through the join table.
const SELECT_WITH_TAGS: &str = "*,category_tags:store_category_tags(category_tag:category_tags(*))";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Scalar store columns, without the embedded tag set.
#[derive(Debug, Deserialize)]
struct StoreRow {
    id: StoreId,
    name: String,
    area_id: AreaId,
    category_id: CategoryId,
    x_link: Option<String>,
    instagram_link: Option<String>,
    website_link: Option<String>,
    x_post_url: Option<String>,
    google_map_link: Option<String>,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoreRow {
    fn into_store(self, category_tags: Vec<CategoryTag>) -> Store {
        Store {
            id: self.id,
            name: self.name,
            area_id: self.area_id,
            category_id: self.category_id,
            x_link: self.x_link,
            instagram_link: self.instagram_link,
            website_link: self.website_link,
            x_post_url: self.x_post_url,
            google_map_link: self.google_map_link,
            description: self.description,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
            category_tags,
        }
    }
}

/// A store row with the embedded join-table representation.
#[derive(Debug, Deserialize)]
struct StoreWithTagsRow {
    #[serde(flatten)]
    store: StoreRow,
    #[serde(default)]
    category_tags: Vec<TagLink>,
}

/// One embedded join row (`{"category_tag": {...}}`).
#[derive(Debug, Deserialize)]
struct TagLink {
    category_tag: CategoryTag,
}

impl StoreWithTagsRow {
    fn into_store(self) -> Store {
        let tags = self
            .category_tags
            .into_iter()
            .map(|link| link.category_tag)
            .collect();
        self.store.into_store(tags)
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: StoreId,
}

/// A `store_category_tags` join row.
#[derive(Debug, Serialize, Deserialize)]
struct StoreTagRow {
    store_id: StoreId,
    category_tag_id: CategoryTagId,
}

#[derive(Debug, Deserialize)]
struct TagIdRow {
    category_tag_id: CategoryTagId,
}

// =============================================================================
// Write Payloads
// =============================================================================

/// Column values for a store insert.
///
/// Unset link/description fields are written as explicit nulls, matching the
/// admin form semantics.
#[derive(Debug, Serialize)]
pub struct NewStoreRow {
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
}

/// Column values for a store update.
///
/// The admin edit form always submits the full field set, so every column is
/// rewritten (links back to null when cleared); only `category_id` is
/// optional, left untouched when the form did not send one.
#[derive(Debug, Serialize)]
pub struct StoreChanges {
    pub name: String,
    pub area_id: AreaId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub x_link: Option<String>,
    pub instagram_link: Option<String>,
    pub website_link: Option<String>,
    pub x_post_url: Option<String>,
    pub google_map_link: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Filters for the public store search.
#[derive(Debug, Default, Clone)]
pub struct StoreSearch {
    pub area_id: Option<AreaId>,
    pub area_ids: Vec<AreaId>,
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for store rows and their tag associations.
pub struct StoreRepository<'a> {
    db: &'a Db,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Public search: active stores only, newest first, paginated with an
    /// exact total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn search_public(
        &self,
        filter: &StoreSearch,
        page: PageRequest,
    ) -> Result<(Vec<Store>, u64), RepositoryError> {
        let mut query = self.db.from(TABLE).eq("is_active", true);

        if let Some(area_id) = filter.area_id {
            query = query.eq("area_id", area_id);
        }
        if !filter.area_ids.is_empty() {
            query = query.in_set("area_id", &filter.area_ids);
        }
        if let Some(category_id) = filter.category_id {
            query = query.eq("category_id", category_id);
        }
        if let Some(search) = filter.search.as_deref()
            && !search.is_empty()
        {
            query = query.contains_ci("name", search);
        }

        let (from, to) = page.row_range();
        let rows = query
            .order_desc("created_at")
            .range(from, to)
            .count_exact()
            .fetch::<Store>()
            .await?;
        let total = rows.total.unwrap_or(rows.rows.len() as u64);
        Ok((rows.rows, total))
    }

    /// Admin listing: every store, newest first, paginated with an exact
    /// total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list(&self, page: PageRequest) -> Result<(Vec<Store>, u64), RepositoryError> {
        let (from, to) = page.row_range();
        let rows = self
            .db
            .from(TABLE)
            .order_desc("created_at")
            .range(from, to)
            .count_exact()
            .fetch::<Store>()
            .await?;
        let total = rows.total.unwrap_or(rows.rows.len() as u64);
        Ok((rows.rows, total))
    }

    /// Fetch one store with its tags.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists.
    pub async fn get(&self, id: StoreId) -> Result<Store, RepositoryError> {
        let row = self
            .db
            .from(TABLE)
            .select(SELECT_WITH_TAGS)
            .eq("id", id)
            .fetch_one::<StoreWithTagsRow>()
            .await?;
        Ok(row.into_store())
    }

    /// Fetch one active store with its tags (public detail view).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for absent and inactive rows alike.
    pub async fn get_public(&self, id: StoreId) -> Result<Store, RepositoryError> {
        let row = self
            .db
            .from(TABLE)
            .select(SELECT_WITH_TAGS)
            .eq("id", id)
            .eq("is_active", true)
            .fetch_one::<StoreWithTagsRow>()
            .await?;
        Ok(row.into_store())
    }

    /// Look up a store id by exact name, optionally excluding one row
    /// (duplicate-name probe).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn find_id_by_name(
        &self,
        name: &str,
        exclude: Option<StoreId>,
    ) -> Result<Option<StoreId>, RepositoryError> {
        let mut query = self.db.from(TABLE).select("id").eq("name", name);
        if let Some(id) = exclude {
            query = query.neq("id", id);
        }
        let rows = query.limit(1).fetch::<IdRow>().await?;
        Ok(rows.rows.into_iter().next().map(|row| row.id))
    }

    /// Insert a new store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a duplicate name.
    pub async fn insert(&self, row: &NewStoreRow) -> Result<Store, RepositoryError> {
        self.db.from(TABLE).insert(row).await
    }

    /// Update a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such row exists and
    /// `RepositoryError::Conflict` on a duplicate name.
    pub async fn update(
        &self,
        id: StoreId,
        changes: &StoreChanges,
    ) -> Result<Store, RepositoryError> {
        self.db.from(TABLE).eq("id", id).update(changes).await
    }

    /// Delete a store and its join rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if either delete fails.
    pub async fn delete(&self, id: StoreId) -> Result<(), RepositoryError> {
        // Join rows first so the FK cannot block the row delete.
        self.db.from(JOIN_TABLE).eq("store_id", id).delete().await?;
        self.db.from(TABLE).eq("id", id).delete().await
    }

    /// Tag ids currently attached to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn tag_ids(&self, id: StoreId) -> Result<Vec<CategoryTagId>, RepositoryError> {
        let rows = self
            .db
            .from(JOIN_TABLE)
            .select("category_tag_id")
            .eq("store_id", id)
            .fetch::<TagIdRow>()
            .await?;
        Ok(rows.rows.into_iter().map(|row| row.category_tag_id).collect())
    }

    /// Attach tags to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the batch insert fails.
    pub async fn attach_tags(
        &self,
        id: StoreId,
        tag_ids: &[CategoryTagId],
    ) -> Result<(), RepositoryError> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<StoreTagRow> = tag_ids
            .iter()
            .map(|&category_tag_id| StoreTagRow {
                store_id: id,
                category_tag_id,
            })
            .collect();
        self.db.from(JOIN_TABLE).insert_many(&rows).await
    }

    /// Replace a store's tag set with `desired`.
    ///
    /// Computes a diff against the current set and only inserts/deletes the
    /// difference, so a concurrent reader never observes an empty set while a
    /// non-empty one is being written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any of the involved queries fail.
    pub async fn replace_tags(
        &self,
        id: StoreId,
        desired: &[CategoryTagId],
    ) -> Result<(), RepositoryError> {
        let current = self.tag_ids(id).await?;
        let (to_add, to_remove) = tag_diff(&current, desired);

        if !to_remove.is_empty() {
            self.db
                .from(JOIN_TABLE)
                .eq("store_id", id)
                .in_set("category_tag_id", &to_remove)
                .delete()
                .await?;
        }
        self.attach_tags(id, &to_add).await
    }

    /// Whether any store references the given area.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the probe fails.
    pub async fn references_area(&self, area_id: AreaId) -> Result<bool, RepositoryError> {
        self.db.from(TABLE).eq("area_id", area_id).exists().await
    }

    /// Whether any store references the given category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the probe fails.
    pub async fn references_category(
        &self,
        category_id: CategoryId,
    ) -> Result<bool, RepositoryError> {
        self.db
            .from(TABLE)
            .eq("category_id", category_id)
            .exists()
            .await
    }

    /// Whether any join row references the given tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the probe fails.
    pub async fn any_tagged_with(&self, tag_id: CategoryTagId) -> Result<bool, RepositoryError> {
        self.db
            .from(JOIN_TABLE)
            .eq("category_tag_id", tag_id)
            .exists()
            .await
    }
}

/// Compute the (insert, delete) sets turning `current` into `desired`.
fn tag_diff(
    current: &[CategoryTagId],
    desired: &[CategoryTagId],
) -> (Vec<CategoryTagId>, Vec<CategoryTagId>) {
    let current_set: BTreeSet<CategoryTagId> = current.iter().copied().collect();
    let desired_set: BTreeSet<CategoryTagId> = desired.iter().copied().collect();
    let to_add = desired_set.difference(&current_set).copied().collect();
    let to_remove = current_set.difference(&desired_set).copied().collect();
    (to_add, to_remove)
}
