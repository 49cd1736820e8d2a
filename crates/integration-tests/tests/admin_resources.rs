//! Integration tests for admin resource management.
//!
//! Requires a running server; each test logs in with the shared password and
//! cleans up the rows it creates. Run with:
//! cargo test -p hondana-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use hondana_integration_tests::{base_url, client, json_body, login, unique_name};

async fn create_area(client: &Client, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/admin/areas", base_url()))
        .json(&json!({ "name": name, "prefecture": "東京都", "sort_order": 99 }))
        .send()
        .await
        .expect("create area failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp, true).await;
    body["data"]["area"]["id"].as_i64().expect("area id")
}

async fn create_category(client: &Client, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/admin/categories", base_url()))
        .json(&json!({ "name": name, "display_name": name, "sort_order": 99 }))
        .send()
        .await
        .expect("create category failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp, true).await;
    body["data"]["category"]["id"].as_i64().expect("category id")
}

async fn create_tag(client: &Client, name: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/admin/category-tags", base_url()))
        .json(&json!({ "name": name, "display_name": name }))
        .send()
        .await
        .expect("create tag failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp, true).await;
    body["data"]["category_tag"]["id"]
        .as_i64()
        .expect("tag id")
}

async fn delete_resource(client: &Client, path: &str) -> StatusCode {
    client
        .delete(format!("{}{path}", base_url()))
        .send()
        .await
        .expect("delete failed")
        .status()
}

async fn store_tags(client: &Client, store_id: &str) -> Vec<Value> {
    let resp = client
        .get(format!("{}/api/admin/stores/{store_id}", base_url()))
        .send()
        .await
        .expect("get store failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    body["data"]["store"]["category_tags"]
        .as_array()
        .expect("category_tags")
        .clone()
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_store_lifecycle_with_tags_and_guards() {
    let client = client();
    login(&client).await;
    let base_url = base_url();

    let area_name = unique_name("area");
    let category_name = unique_name("category");
    let tag_a = unique_name("tag-a");
    let tag_b = unique_name("tag-b");
    let store_name = unique_name("store");

    let area_id = create_area(&client, &area_name).await;
    let category_id = create_category(&client, &category_name).await;
    let tag_a_id = create_tag(&client, &tag_a).await;
    let tag_b_id = create_tag(&client, &tag_b).await;

    // Create a store carrying one tag
    let resp = client
        .post(format!("{base_url}/api/admin/stores"))
        .json(&json!({
            "name": store_name,
            "area_id": area_id,
            "category_id": category_id,
            "category_tag_ids": [tag_a_id],
            "website_link": "https://example.org",
            "is_active": false
        }))
        .send()
        .await
        .expect("create store failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp, true).await;
    let store_id = body["data"]["store"]["id"]
        .as_str()
        .expect("store id")
        .to_string();

    // Duplicate name is rejected and creates no second row
    let resp = client
        .post(format!("{base_url}/api/admin/stores"))
        .json(&json!({
            "name": store_name,
            "area_id": area_id,
            "category_id": category_id
        }))
        .send()
        .await
        .expect("duplicate create failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp, false).await;
    assert_eq!(body["error"]["code"], "DUPLICATE_ERROR");

    // The inactive store is hidden from the public endpoint but visible to admin
    let resp = client
        .get(format!("{base_url}/api/stores/{store_id}"))
        .send()
        .await
        .expect("public get failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let tags = store_tags(&client, &store_id).await;
    assert_eq!(tags.len(), 1);

    // Referenced reference data cannot be deleted
    for path in [
        format!("/api/admin/areas/{area_id}"),
        format!("/api/admin/categories/{category_id}"),
        format!("/api/admin/category-tags/{tag_a_id}"),
    ] {
        assert_eq!(
            delete_resource(&client, &path).await,
            StatusCode::BAD_REQUEST,
            "{path} delete should be guarded"
        );
    }

    // Updating with an unchanged name does not trip the duplicate check;
    // the tag set is replaced by the submitted list
    let resp = client
        .patch(format!("{base_url}/api/admin/stores/{store_id}"))
        .json(&json!({
            "name": store_name,
            "area_id": area_id,
            "category_tag_ids": [tag_b_id],
            "is_active": true
        }))
        .send()
        .await
        .expect("update store failed");
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp, true).await;

    let tags = store_tags(&client, &store_id).await;
    let tag_ids: Vec<i64> = tags
        .iter()
        .map(|t| t["id"].as_i64().expect("tag id"))
        .collect();
    assert_eq!(tag_ids, vec![tag_b_id]);

    // The store is active now, so the public endpoint serves it
    let resp = client
        .get(format!("{base_url}/api/stores/{store_id}"))
        .send()
        .await
        .expect("public get failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Replacing the tag set with [] removes every join row, unblocking tag_b
    let resp = client
        .patch(format!("{base_url}/api/admin/stores/{store_id}"))
        .json(&json!({
            "name": store_name,
            "area_id": area_id,
            "category_tag_ids": []
        }))
        .send()
        .await
        .expect("update store failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(store_tags(&client, &store_id).await.is_empty());

    // An unreferenced tag deletes cleanly
    assert_eq!(
        delete_resource(&client, &format!("/api/admin/category-tags/{tag_a_id}")).await,
        StatusCode::OK
    );
    assert_eq!(
        delete_resource(&client, &format!("/api/admin/category-tags/{tag_b_id}")).await,
        StatusCode::OK
    );

    // Clean up: store first, then its references
    assert_eq!(
        delete_resource(&client, &format!("/api/admin/stores/{store_id}")).await,
        StatusCode::OK
    );
    assert_eq!(
        delete_resource(&client, &format!("/api/admin/areas/{area_id}")).await,
        StatusCode::OK
    );
    assert_eq!(
        delete_resource(&client, &format!("/api/admin/categories/{category_id}")).await,
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_area_update_with_unchanged_name_skips_duplicate_check() {
    let client = client();
    login(&client).await;
    let base_url = base_url();

    let name = unique_name("area");
    let area_id = create_area(&client, &name).await;

    // PATCH with the same name must not collide with itself
    let resp = client
        .patch(format!("{base_url}/api/admin/areas/{area_id}"))
        .json(&json!({ "name": name, "prefecture": "大阪府" }))
        .send()
        .await
        .expect("update area failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp, true).await;
    assert_eq!(body["data"]["area"]["prefecture"], "大阪府");

    assert_eq!(
        delete_resource(&client, &format!("/api/admin/areas/{area_id}")).await,
        StatusCode::OK
    );
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_unknown_request_fields_are_rejected() {
    let client = client();
    login(&client).await;

    let resp = client
        .post(format!("{}/api/admin/areas", base_url()))
        .json(&json!({
            "name": unique_name("area"),
            "prefecture": "東京都",
            "postal_code": "100-0001"
        }))
        .send()
        .await
        .expect("create area failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp, false).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_missing_required_fields_are_a_validation_error() {
    let client = client();
    login(&client).await;
    let base_url = base_url();

    // Category without a display_name
    let resp = client
        .post(format!("{base_url}/api/admin/categories"))
        .json(&json!({ "name": unique_name("category") }))
        .send()
        .await
        .expect("create category failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Store without its reference fields
    let resp = client
        .post(format!("{base_url}/api/admin/stores"))
        .json(&json!({ "name": unique_name("store") }))
        .send()
        .await
        .expect("create store failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_missing_rows_are_404() {
    let client = client();
    login(&client).await;
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/admin/areas/999999"))
        .send()
        .await
        .expect("get area failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!(
            "{base_url}/api/admin/stores/00000000-0000-0000-0000-000000000000"
        ))
        .send()
        .await
        .expect("delete store failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
