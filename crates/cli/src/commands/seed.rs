//! Seed the hosted database from a YAML file.
//!
//! The file declares areas, categories, category tags, and stores; stores
//! reference areas/categories/tags by name. Rows whose unique name already
//! exists are skipped, so re-running a seed file is safe.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use hondana_core::CategoryTagId;
use hondana_server::config::DatabaseConfig;
use hondana_server::db::areas::NewAreaRow;
use hondana_server::db::categories::NewCategoryRow;
use hondana_server::db::category_tags::NewCategoryTagRow;
use hondana_server::db::stores::NewStoreRow;
use hondana_server::db::{
    AreaRepository, CategoryRepository, CategoryTagRepository, Db, StoreRepository,
};

/// Parsed seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub areas: Vec<SeedArea>,
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub category_tags: Vec<SeedCategoryTag>,
    #[serde(default)]
    pub stores: Vec<SeedStore>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedArea {
    pub name: String,
    pub prefecture: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCategory {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedCategoryTag {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedStore {
    pub name: String,
    /// Area name (must exist in this file or in the database).
    pub area: String,
    /// Category name (must exist in this file or in the database).
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub x_link: Option<String>,
    #[serde(default)]
    pub instagram_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub x_post_url: Option<String>,
    #[serde(default)]
    pub google_map_link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Outcome counters for a seeding run.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
    pub errors: Vec<(String, String)>,
}

/// Validate a parsed seed file; returns human-readable problems.
#[must_use]
pub fn validate(file: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();

    check_names(
        "area",
        file.areas.iter().map(|a| a.name.as_str()),
        &mut errors,
    );
    check_names(
        "category",
        file.categories.iter().map(|c| c.name.as_str()),
        &mut errors,
    );
    check_names(
        "category tag",
        file.category_tags.iter().map(|t| t.name.as_str()),
        &mut errors,
    );
    check_names(
        "store",
        file.stores.iter().map(|s| s.name.as_str()),
        &mut errors,
    );

    for area in &file.areas {
        if area.prefecture.trim().is_empty() {
            errors.push(format!("area '{}' has an empty prefecture", area.name));
        }
    }
    for store in &file.stores {
        if store.area.trim().is_empty() {
            errors.push(format!("store '{}' has an empty area reference", store.name));
        }
        if store.category.trim().is_empty() {
            errors.push(format!(
                "store '{}' has an empty category reference",
                store.name
            ));
        }
    }

    errors
}

fn check_names<'a>(kind: &str, names: impl Iterator<Item = &'a str>, errors: &mut Vec<String>) {
    let mut seen = std::collections::BTreeSet::new();
    for name in names {
        if name.trim().is_empty() {
            errors.push(format!("{kind} with an empty name"));
        } else if !seen.insert(name) {
            errors.push(format!("duplicate {kind} name '{name}'"));
        }
    }
}

/// Run the seed command.
///
/// # Errors
///
/// Returns an error if configuration is missing, the file cannot be read or
/// parsed, validation fails, or a reference-data insert fails. Per-store
/// failures are collected in the summary instead of aborting the run.
pub async fn run(file_path: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed file");
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;

    let problems = validate(&seed);
    if !problems.is_empty() {
        error!("Seed file validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(format!("{} validation errors found", problems.len()).into());
    }

    info!(
        areas = seed.areas.len(),
        categories = seed.categories.len(),
        category_tags = seed.category_tags.len(),
        stores = seed.stores.len(),
        "Seed file validated"
    );

    if dry_run {
        info!("Dry run requested; nothing written");
        return Ok(());
    }

    let config = DatabaseConfig::from_env()?;
    let db = Db::new(&config);
    db.ping().await?;
    info!("Connected to hosted database");

    let mut summary = SeedSummary::default();

    seed_areas(&db, &seed, &mut summary).await?;
    seed_categories(&db, &seed, &mut summary).await?;
    seed_category_tags(&db, &seed, &mut summary).await?;
    seed_stores(&db, &seed, &mut summary).await;

    info!("Seeding complete!");
    info!("  Rows inserted: {}", summary.inserted);
    info!("  Rows skipped (already exist): {}", summary.skipped);

    if !summary.errors.is_empty() {
        error!("  Errors: {}", summary.errors.len());
        for (name, err) in &summary.errors {
            error!("    - {name}: {err}");
        }
    }

    Ok(())
}

async fn seed_areas(
    db: &Db,
    seed: &SeedFile,
    summary: &mut SeedSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let areas = AreaRepository::new(db);
    for area in &seed.areas {
        if areas.find_id_by_name(&area.name, None).await?.is_some() {
            summary.skipped += 1;
            continue;
        }
        areas
            .insert(&NewAreaRow {
                name: area.name.clone(),
                prefecture: area.prefecture.clone(),
                sort_order: area.sort_order,
                is_active: true,
            })
            .await?;
        summary.inserted += 1;
    }
    Ok(())
}

async fn seed_categories(
    db: &Db,
    seed: &SeedFile,
    summary: &mut SeedSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let categories = CategoryRepository::new(db);
    for category in &seed.categories {
        if categories
            .find_id_by_name(&category.name, None)
            .await?
            .is_some()
        {
            summary.skipped += 1;
            continue;
        }
        categories
            .insert(&NewCategoryRow {
                name: category.name.clone(),
                display_name: category.display_name.clone(),
                description: category.description.clone(),
                sort_order: category.sort_order,
                is_active: true,
            })
            .await?;
        summary.inserted += 1;
    }
    Ok(())
}

async fn seed_category_tags(
    db: &Db,
    seed: &SeedFile,
    summary: &mut SeedSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let tags = CategoryTagRepository::new(db);
    for tag in &seed.category_tags {
        if tags.find_id_by_name(&tag.name, None).await?.is_some() {
            summary.skipped += 1;
            continue;
        }
        tags.insert(&NewCategoryTagRow {
            name: tag.name.clone(),
            display_name: tag.display_name.clone(),
            is_active: true,
        })
        .await?;
        summary.inserted += 1;
    }
    Ok(())
}

/// Seed stores, resolving area/category/tag references by name.
///
/// Per-store failures are recorded and do not abort the remaining rows.
async fn seed_stores(db: &Db, seed: &SeedFile, summary: &mut SeedSummary) {
    let stores = StoreRepository::new(db);
    let areas = AreaRepository::new(db);
    let categories = CategoryRepository::new(db);
    let tags = CategoryTagRepository::new(db);

    for store in &seed.stores {
        let outcome: Result<bool, String> = async {
            if stores
                .find_id_by_name(&store.name, None)
                .await
                .map_err(|e| e.to_string())?
                .is_some()
            {
                return Ok(false);
            }

            let area_id = areas
                .find_id_by_name(&store.area, None)
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("unknown area '{}'", store.area))?;
            let category_id = categories
                .find_id_by_name(&store.category, None)
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("unknown category '{}'", store.category))?;

            let mut tag_ids: Vec<CategoryTagId> = Vec::new();
            for tag_name in &store.tags {
                let tag_id = tags
                    .find_id_by_name(tag_name, None)
                    .await
                    .map_err(|e| e.to_string())?
                    .ok_or_else(|| format!("unknown category tag '{tag_name}'"))?;
                tag_ids.push(tag_id);
            }

            let inserted = stores
                .insert(&NewStoreRow {
                    name: store.name.clone(),
                    area_id,
                    category_id,
                    x_link: store.x_link.clone(),
                    instagram_link: store.instagram_link.clone(),
                    website_link: store.website_link.clone(),
                    x_post_url: store.x_post_url.clone(),
                    google_map_link: store.google_map_link.clone(),
                    description: store.description.clone(),
                    is_active: true,
                })
                .await
                .map_err(|e| e.to_string())?;

            stores
                .attach_tags(inserted.id, &tag_ids)
                .await
                .map_err(|e| e.to_string())?;

            Ok(true)
        }
        .await;

        match outcome {
            Ok(true) => summary.inserted += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => summary.errors.push((store.name.clone(), e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"
areas:
  - name: Shimokitazawa
    prefecture: Tokyo
    sort_order: 1
categories:
  - name: general
    display_name: General
    sort_order: 1
category_tags:
  - name: coffee
    display_name: Coffee
stores:
  - name: Loop Books
    area: Shimokitazawa
    category: general
    tags: [coffee]
    website_link: https://loopbooks.example
";

    #[test]
    fn test_parse_sample() {
        let seed: SeedFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(seed.areas.len(), 1);
        assert_eq!(seed.stores.len(), 1);
        assert_eq!(seed.stores[0].tags, vec!["coffee".to_string()]);
        assert!(validate(&seed).is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let seed: SeedFile = serde_yaml::from_str(
            r"
areas:
  - name: Same
    prefecture: Tokyo
  - name: Same
    prefecture: Osaka
",
        )
        .unwrap();
        let problems = validate(&seed);
        assert_eq!(problems, vec!["duplicate area name 'Same'".to_string()]);
    }

    #[test]
    fn test_validate_rejects_empty_references() {
        let seed: SeedFile = serde_yaml::from_str(
            r"
stores:
  - name: Nameless refs
    area: ''
    category: ''
",
        )
        .unwrap();
        let problems = validate(&seed);
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<SeedFile, _> = serde_yaml::from_str(
            r"
areas:
  - name: Tokyo
    prefecture: Tokyo
    postal_code: 100-0001
",
        );
        assert!(result.is_err());
    }
}
