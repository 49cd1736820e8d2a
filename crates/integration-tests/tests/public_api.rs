//! Integration tests for the public JSON API.
//!
//! Requires a running server against a seeded database.
//! Run with: cargo test -p hondana-integration-tests -- --ignored

use reqwest::StatusCode;

use hondana_integration_tests::{base_url, client, json_body};

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_store_list_pagination_contract() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/stores?page=1&limit=2"))
        .send()
        .await
        .expect("stores request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp, true).await;
    let data = &body["data"];

    let stores = data["stores"].as_array().expect("stores is an array");
    assert!(stores.len() <= 2, "page must hold at most `limit` items");

    let pagination = &data["pagination"];
    assert_eq!(pagination["page"], 1);
    assert_eq!(pagination["limit"], 2);
    let total = pagination["total"].as_u64().expect("total");
    let total_pages = pagination["totalPages"].as_u64().expect("totalPages");
    assert_eq!(total_pages, total.div_ceil(2), "totalPages == ceil(total/limit)");

    // Every listed store is active on the public endpoint
    for store in stores {
        assert_eq!(store["is_active"], true);
    }
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_store_search_filters() {
    let client = client();
    let base_url = base_url();

    // A name-substring search only returns matching stores
    let resp = client
        .get(format!("{base_url}/api/stores?search=書"))
        .send()
        .await
        .expect("stores request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    for store in body["data"]["stores"].as_array().expect("stores") {
        let name = store["name"].as_str().expect("name");
        assert!(name.contains('書'), "'{name}' does not match the search");
    }

    // Multi-area search accepts a comma-separated id list
    let resp = client
        .get(format!("{base_url}/api/stores?area_ids=1,2"))
        .send()
        .await
        .expect("stores request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    for store in body["data"]["stores"].as_array().expect("stores") {
        let area_id = store["area_id"].as_i64().expect("area_id");
        assert!([1, 2].contains(&area_id));
    }
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_unknown_store_detail_is_404() {
    let client = client();

    let resp = client
        .get(format!(
            "{}/api/stores/00000000-0000-0000-0000-000000000000",
            base_url()
        ))
        .send()
        .await
        .expect("store request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp, false).await;
    assert_eq!(body["error"]["code"], "STORE_NOT_FOUND");
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_reference_data_endpoints() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/areas"))
        .send()
        .await
        .expect("areas request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    let areas = body["data"]["areas"].as_array().expect("areas");
    let orders: Vec<i64> = areas
        .iter()
        .map(|a| a["sort_order"].as_i64().expect("sort_order"))
        .collect();
    let mut sorted = orders.clone();
    sorted.sort_unstable();
    assert_eq!(orders, sorted, "areas are served in display order");

    let resp = client
        .get(format!("{base_url}/api/categories"))
        .send()
        .await
        .expect("categories request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp, true).await;

    let resp = client
        .get(format!("{base_url}/api/category-tags"))
        .send()
        .await
        .expect("category-tags request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    for tag in body["data"]["category_tags"].as_array().expect("tags") {
        assert_eq!(tag["is_active"], true);
    }
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_public_pages_render() {
    let client = client();
    let base_url = base_url();

    for path in ["/", "/stores", "/health"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("page request failed");
        assert_eq!(resp.status(), StatusCode::OK, "{path} should render");
    }

    let resp = client
        .get(format!(
            "{base_url}/stores/00000000-0000-0000-0000-000000000000"
        ))
        .send()
        .await
        .expect("page request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
