//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Public pages (server-rendered)
//! GET  /                          - Home / search entry point
//! GET  /stores                    - Store list (filter + paginate)
//! GET  /stores/{id}               - Store detail
//!
//! # Public JSON API (active rows only)
//! GET  /api/stores                - Search stores
//! GET  /api/stores/{id}           - Store detail with tags
//! GET  /api/areas                 - Areas in display order
//! GET  /api/categories            - Categories in display order
//! GET  /api/category-tags         - Tags in name order
//!
//! # Admin auth
//! POST /api/admin/login           - Shared-password login (sets cookie)
//! POST /api/admin/logout          - Clear session cookie
//! GET  /api/admin/me              - Current admin identity
//!
//! # Admin resources (session required)
//! GET/POST        /api/admin/stores
//! GET/PATCH/DELETE /api/admin/stores/{id}
//! GET/POST        /api/admin/areas
//! GET/PATCH/DELETE /api/admin/areas/{id}
//! GET/POST        /api/admin/categories
//! GET/PATCH/DELETE /api/admin/categories/{id}
//! GET/POST        /api/admin/category-tags
//! GET/PATCH/DELETE /api/admin/category-tags/{id}
//! ```
//!
//! Every JSON endpoint answers with the `{"success": ..., ...}` envelope;
//! request bodies are typed structs rejecting unknown fields.

pub mod admin;
pub mod areas;
pub mod auth;
pub mod categories;
pub mod category_tags;
pub mod pages;
pub mod stores;

use axum::extract::{FromRequest, Request};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(pages::router())
        .merge(stores::router())
        .merge(areas::router())
        .merge(categories::router())
        .merge(category_tags::router())
        .merge(auth::router())
        .merge(admin::router())
}

/// JSON success envelope.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `{"success": true, "data": ...}`
pub fn success<T: Serialize>(data: T) -> Json<ApiSuccess<T>> {
    Json(ApiSuccess {
        success: true,
        data: Some(data),
        message: None,
    })
}

/// `{"success": true, "data": ..., "message": ...}`
pub fn success_with_message<T: Serialize>(
    data: T,
    message: impl Into<String>,
) -> Json<ApiSuccess<T>> {
    Json(ApiSuccess {
        success: true,
        data: Some(data),
        message: Some(message.into()),
    })
}

/// `{"success": true, "message": ...}`
pub fn success_message(message: impl Into<String>) -> Json<ApiSuccess<()>> {
    Json(ApiSuccess {
        success: true,
        data: None,
        message: Some(message.into()),
    })
}

/// Deserialize an optional numeric query parameter, treating an empty string
/// (what an HTML form submits for an untouched select) as absent.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// JSON body extractor whose rejection uses the error envelope.
///
/// Malformed bodies, missing required fields, and unknown fields all surface
/// as a 400 `VALIDATION_ERROR` before any handler logic runs.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = success(serde_json::json!({"answer": 42}));
        let json = serde_json::to_value(&body.0).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["answer"], 42);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let body = success_message("done");
        let json = serde_json::to_value(&body.0).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_empty_as_none_accepts_blank_form_values() {
        #[derive(Debug, Deserialize)]
        struct Q {
            #[serde(default, deserialize_with = "empty_as_none")]
            area_id: Option<i32>,
        }

        let q: Q = parse_query("area_id=");
        assert_eq!(q.area_id, None);

        let q: Q = parse_query("area_id=7");
        assert_eq!(q.area_id, Some(7));

        let q: Q = parse_query("");
        assert_eq!(q.area_id, None);
    }

    fn parse_query<T: DeserializeOwned>(query: &str) -> T {
        serde_json::from_value(
            serde_json::to_value(
                query
                    .split('&')
                    .filter_map(|pair| pair.split_once('='))
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<std::collections::HashMap<_, _>>(),
            )
            .unwrap(),
        )
        .unwrap()
    }
}
