//! Public page handlers (server-rendered).

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use hondana_core::{Pagination, StoreId};

use crate::db::{AreaRepository, CategoryRepository, RepositoryError, StoreRepository};
use crate::filters;
use crate::models::{Area, Category, Store};
use crate::state::AppState;

use super::stores::StoreListQuery;

/// Build the public pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/stores", get(stores_index))
        .route("/stores/{id}", get(store_show))
}

// =============================================================================
// View Models
// =============================================================================

/// Area option for the search form.
pub struct AreaOption {
    pub id: i32,
    pub name: String,
}

impl From<Area> for AreaOption {
    fn from(area: Area) -> Self {
        Self {
            id: area.id.as_i32(),
            name: area.name,
        }
    }
}

/// Category option for the search form.
pub struct CategoryOption {
    pub id: i32,
    pub display_name: String,
}

impl From<Category> for CategoryOption {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.as_i32(),
            display_name: category.display_name,
        }
    }
}

/// Store card for the list page.
pub struct StoreCard {
    pub id: String,
    pub name: String,
    pub area_name: String,
    pub category_name: String,
    pub description: String,
}

/// External link on the detail page.
pub struct ExternalLink {
    pub label: &'static str,
    pub href: String,
}

/// Store detail view.
pub struct StoreDetail {
    pub name: String,
    pub area_name: String,
    pub prefecture: String,
    pub category_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub links: Vec<ExternalLink>,
}

impl StoreDetail {
    fn build(store: Store, area: Option<Area>, category: Option<Category>) -> Self {
        let mut links = Vec::new();
        push_link(&mut links, "Website", store.website_link);
        push_link(&mut links, "X", store.x_link);
        push_link(&mut links, "Instagram", store.instagram_link);
        push_link(&mut links, "Featured post", store.x_post_url);
        push_link(&mut links, "Map", store.google_map_link);

        Self {
            name: store.name,
            area_name: area.as_ref().map_or_else(|| "-".to_string(), |a| a.name.clone()),
            prefecture: area.map(|a| a.prefecture).unwrap_or_default(),
            category_name: category.map_or_else(|| "-".to_string(), |c| c.display_name),
            description: store.description.unwrap_or_default(),
            tags: store
                .category_tags
                .into_iter()
                .filter(|tag| tag.is_active)
                .map(|tag| tag.display_name)
                .collect(),
            links,
        }
    }
}

fn push_link(links: &mut Vec<ExternalLink>, label: &'static str, href: Option<String>) {
    if let Some(href) = href
        && !href.is_empty()
    {
        links.push(ExternalLink { label, href });
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template (search form entry point).
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub areas: Vec<AreaOption>,
    pub categories: Vec<CategoryOption>,
}

/// Store listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/index.html")]
pub struct StoresIndexTemplate {
    pub stores: Vec<StoreCard>,
    pub areas: Vec<AreaOption>,
    pub categories: Vec<CategoryOption>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

/// Store detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "stores/show.html")]
pub struct StoreShowTemplate {
    pub store: StoreDetail,
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the home page.
async fn home(State(state): State<AppState>) -> Response {
    let areas = match AreaRepository::new(state.db()).list_active().await {
        Ok(areas) => areas,
        Err(e) => return render_db_error(&e),
    };
    let categories = match CategoryRepository::new(state.db()).list_active().await {
        Ok(categories) => categories,
        Err(e) => return render_db_error(&e),
    };

    HomeTemplate {
        areas: areas.into_iter().map(Into::into).collect(),
        categories: categories.into_iter().map(Into::into).collect(),
    }
    .into_response()
}

/// Display the store listing page.
async fn stores_index(
    State(state): State<AppState>,
    Query(query): Query<StoreListQuery>,
) -> Response {
    let Ok((filter, page_request)) = query.clone().into_search() else {
        return page_error(StatusCode::BAD_REQUEST, "Invalid search parameters");
    };

    let (stores, total) = match StoreRepository::new(state.db())
        .search_public(&filter, page_request)
        .await
    {
        Ok(result) => result,
        Err(e) => return render_db_error(&e),
    };
    let areas = match AreaRepository::new(state.db()).list_active().await {
        Ok(areas) => areas,
        Err(e) => return render_db_error(&e),
    };
    let categories = match CategoryRepository::new(state.db()).list_active().await {
        Ok(categories) => categories,
        Err(e) => return render_db_error(&e),
    };

    let area_names: HashMap<i32, String> = areas
        .iter()
        .map(|area| (area.id.as_i32(), area.name.clone()))
        .collect();
    let category_names: HashMap<i32, String> = categories
        .iter()
        .map(|category| (category.id.as_i32(), category.display_name.clone()))
        .collect();

    let cards = stores
        .into_iter()
        .map(|store| StoreCard {
            id: store.id.to_string(),
            name: store.name,
            area_name: area_names
                .get(&store.area_id.as_i32())
                .cloned()
                .unwrap_or_else(|| "-".to_string()),
            category_name: category_names
                .get(&store.category_id.as_i32())
                .cloned()
                .unwrap_or_else(|| "-".to_string()),
            description: store.description.unwrap_or_default(),
        })
        .collect();

    let pagination = Pagination::new(page_request, total);
    let prev_href = (pagination.page > 1).then(|| page_href(&query, pagination.page - 1));
    let next_href = (u64::from(pagination.page) < pagination.total_pages)
        .then(|| page_href(&query, pagination.page + 1));

    StoresIndexTemplate {
        stores: cards,
        areas: areas.into_iter().map(Into::into).collect(),
        categories: categories.into_iter().map(Into::into).collect(),
        total: pagination.total,
        page: pagination.page,
        total_pages: pagination.total_pages,
        prev_href,
        next_href,
    }
    .into_response()
}

/// Display the store detail page.
async fn store_show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<StoreId>() else {
        return page_error(StatusCode::NOT_FOUND, "Store not found");
    };

    let store = match StoreRepository::new(state.db()).get_public(id).await {
        Ok(store) => store,
        Err(RepositoryError::NotFound) => {
            return page_error(StatusCode::NOT_FOUND, "Store not found");
        }
        Err(e) => return render_db_error(&e),
    };

    let area = AreaRepository::new(state.db()).get(store.area_id).await.ok();
    let category = CategoryRepository::new(state.db())
        .get(store.category_id)
        .await
        .ok();

    StoreShowTemplate {
        store: StoreDetail::build(store, area, category),
    }
    .into_response()
}

/// Build a `/stores` link keeping the current filters.
fn page_href(query: &StoreListQuery, page: u32) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if let Some(area_id) = query.area_id {
        serializer.append_pair("area_id", &area_id.to_string());
    }
    if let Some(area_ids) = query.area_ids.as_deref()
        && !area_ids.is_empty()
    {
        serializer.append_pair("area_ids", area_ids);
    }
    if let Some(category_id) = query.category_id {
        serializer.append_pair("category_id", &category_id.to_string());
    }
    if let Some(search) = query.search.as_deref()
        && !search.is_empty()
    {
        serializer.append_pair("search", search);
    }
    serializer.append_pair("page", &page.to_string());
    format!("/stores?{}", serializer.finish())
}

fn page_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        ErrorTemplate {
            status: status.as_u16(),
            message: message.to_string(),
        },
    )
        .into_response()
}

fn render_db_error(e: &RepositoryError) -> Response {
    sentry::capture_error(e);
    tracing::error!(error = %e, "page data fetch failed");
    page_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong. Please try again.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_href_keeps_filters() {
        let query = StoreListQuery {
            area_id: Some(3),
            area_ids: None,
            category_id: None,
            search: Some("book & coffee".to_string()),
            page: Some(1),
            limit: None,
        };
        let href = page_href(&query, 2);
        assert_eq!(href, "/stores?area_id=3&search=book+%26+coffee&page=2");
    }

    #[test]
    fn test_page_href_minimal() {
        let query = StoreListQuery::default();
        assert_eq!(page_href(&query, 1), "/stores?page=1");
    }

    #[test]
    fn test_store_detail_build_collects_links_and_tags() {
        use chrono::Utc;
        use hondana_core::{AreaId, CategoryId, CategoryTagId};

        use crate::models::CategoryTag;

        let now = Utc::now();
        let store = Store {
            id: StoreId::new(uuid::Uuid::nil()),
            name: "Loop Books".to_string(),
            area_id: AreaId::new(1),
            category_id: CategoryId::new(1),
            x_link: None,
            instagram_link: Some("https://www.instagram.com/loopbooks/".to_string()),
            website_link: Some("https://loopbooks.example".to_string()),
            x_post_url: None,
            google_map_link: None,
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            category_tags: vec![
                CategoryTag {
                    id: CategoryTagId::new(1),
                    name: "coffee".to_string(),
                    display_name: "Coffee".to_string(),
                    is_active: true,
                    created_at: now,
                },
                CategoryTag {
                    id: CategoryTagId::new(2),
                    name: "retired".to_string(),
                    display_name: "Retired".to_string(),
                    is_active: false,
                    created_at: now,
                },
            ],
        };

        let detail = StoreDetail::build(store, None, None);
        assert_eq!(detail.area_name, "-");
        assert_eq!(detail.tags, vec!["Coffee".to_string()]);
        let labels: Vec<&str> = detail.links.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Website", "Instagram"]);
    }
}
