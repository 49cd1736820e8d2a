//! HTTP client for the hosted PostgREST database service.
//!
//! Builds table-scoped queries with equality/substring/in-set filters,
//! ascending or descending ordering, inclusive-range pagination, and exact
//! counts, and maps the provider's error codes onto [`RepositoryError`].

use std::sync::Arc;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE, RANGE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use secrecy::ExposeSecret;

use crate::config::DatabaseConfig;

use super::{PROVIDER_CODE_NO_ROWS, PROVIDER_CODE_UNIQUE_VIOLATION, RepositoryError};

/// Media type asking the provider for a single JSON object instead of an array.
const ACCEPT_SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// A page of rows plus the exact total when it was requested.
#[derive(Debug)]
pub struct Rows<T> {
    pub rows: Vec<T>,
    pub total: Option<u64>,
}

/// Client for the hosted database service.
///
/// Cheaply cloneable; every repository borrows one of these.
#[derive(Clone)]
pub struct Db {
    inner: Arc<DbInner>,
}

struct DbInner {
    http: reqwest::Client,
    endpoint: String,
    service_key: String,
}

impl Db {
    /// Create a new client for the hosted database service.
    #[must_use]
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            inner: Arc::new(DbInner {
                http: reqwest::Client::new(),
                endpoint: format!("{}/rest/v1", config.url),
                service_key: config.service_key.expose_secret().to_string(),
            }),
        }
    }

    /// Start a query against a table.
    #[must_use]
    pub fn from(&self, table: &'static str) -> Query<'_> {
        Query {
            db: self,
            table,
            select: "*".to_string(),
            params: Vec::new(),
            range: None,
            count_exact: false,
        }
    }

    /// Probe the service with a minimal read.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or rejects the request.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.from("areas")
            .select("id")
            .limit(1)
            .fetch::<serde_json::Value>()
            .await?;
        Ok(())
    }
}

/// Error body returned by the provider.
#[derive(Debug, serde::Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// A query against one table.
///
/// Filters use the provider's operator syntax (`col=eq.v`, `col=ilike.%v%`,
/// `col=in.(a,b)`); pagination uses the inclusive `Range` header; exact counts
/// use `Prefer: count=exact` and are read back from `Content-Range`.
#[must_use]
pub struct Query<'a> {
    db: &'a Db,
    table: &'static str,
    select: String,
    params: Vec<(String, String)>,
    range: Option<(u64, u64)>,
    count_exact: bool,
}

impl Query<'_> {
    /// Restrict the returned columns (or set an embedded select).
    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    /// Equality filter.
    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Negated equality filter.
    pub fn neq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.params
            .push((column.to_string(), format!("neq.{value}")));
        self
    }

    /// Case-insensitive substring filter.
    ///
    /// The needle is escaped so `%`, `_`, and `\` match literally.
    pub fn contains_ci(mut self, column: &str, needle: &str) -> Self {
        let escaped = needle
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        self.params
            .push((column.to_string(), format!("ilike.%{escaped}%")));
        self
    }

    /// In-set filter over integer-like values.
    pub fn in_set<T: std::fmt::Display>(mut self, column: &str, values: &[T]) -> Self {
        let list = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.params
            .push((column.to_string(), format!("in.({list})")));
        self
    }

    /// Ascending sort by a column.
    pub fn order_asc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.asc")));
        self
    }

    /// Descending sort by a column.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.desc")));
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, n: u64) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    /// Inclusive row index range (offset/limit pagination).
    pub const fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some((from, to));
        self
    }

    /// Ask the provider for an exact total row count.
    pub const fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    /// Fetch all matching rows (plus the exact count when requested).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on transport, provider, or decode failure.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Rows<T>, RepositoryError> {
        let mut prefer = Vec::new();
        if self.count_exact {
            prefer.push("count=exact");
        }
        let (body, total) = self
            .send(Method::GET, None::<&()>, false, &prefer)
            .await?;
        let rows = serde_json::from_str(&body)?;
        Ok(Rows { rows, total })
    }

    /// Fetch exactly one row.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when no row matches, otherwise
    /// transport/provider/decode errors.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, RepositoryError> {
        let (body, _) = self.send(Method::GET, None::<&()>, true, &[]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch at most one row.
    ///
    /// # Errors
    ///
    /// Returns transport/provider/decode errors; an empty result is `None`.
    pub async fn fetch_optional<T: DeserializeOwned>(self) -> Result<Option<T>, RepositoryError> {
        match self.fetch_one().await {
            Ok(row) => Ok(Some(row)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Check whether any row matches the filters (limit-1 probe).
    ///
    /// # Errors
    ///
    /// Returns transport/provider/decode errors.
    pub async fn exists(self) -> Result<bool, RepositoryError> {
        let rows = self
            .select("id")
            .limit(1)
            .fetch::<serde_json::Value>()
            .await?;
        Ok(!rows.rows.is_empty())
    }

    /// Insert one row and return its representation.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] on a unique violation, otherwise
    /// transport/provider/decode errors.
    pub async fn insert<T: DeserializeOwned>(
        self,
        row: &impl Serialize,
    ) -> Result<T, RepositoryError> {
        let (body, _) = self
            .send(Method::POST, Some(row), true, &["return=representation"])
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Insert a batch of rows without reading them back.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] on a unique violation, otherwise
    /// transport/provider errors.
    pub async fn insert_many(self, rows: &impl Serialize) -> Result<(), RepositoryError> {
        self.send(Method::POST, Some(rows), false, &["return=minimal"])
            .await?;
        Ok(())
    }

    /// Apply a partial update to the filtered rows and return the single
    /// updated representation.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when no row matches the filters,
    /// [`RepositoryError::Conflict`] on a unique violation, otherwise
    /// transport/provider/decode errors.
    pub async fn update<T: DeserializeOwned>(
        self,
        changes: &impl Serialize,
    ) -> Result<T, RepositoryError> {
        let (body, _) = self
            .send(Method::PATCH, Some(changes), true, &["return=representation"])
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Delete the filtered rows.
    ///
    /// # Errors
    ///
    /// Returns transport/provider errors. Deleting zero rows is not an error.
    pub async fn delete(self) -> Result<(), RepositoryError> {
        self.send(Method::DELETE, None::<&()>, false, &["return=minimal"])
            .await?;
        Ok(())
    }

    /// Execute the request and return the raw body plus the exact total
    /// parsed from `Content-Range` (when present).
    async fn send(
        self,
        method: Method,
        body: Option<&impl Serialize>,
        single_object: bool,
        prefer: &[&str],
    ) -> Result<(String, Option<u64>), RepositoryError> {
        let url = format!("{}/{}", self.db.inner.endpoint, self.table);
        let mut request = self
            .db
            .inner
            .http
            .request(method, &url)
            .header("apikey", &self.db.inner.service_key)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.db.inner.service_key),
            )
            .query(&[("select", self.select.as_str())])
            .query(&self.params);

        if single_object {
            request = request.header(ACCEPT, ACCEPT_SINGLE_OBJECT);
        }
        if let Some((from, to)) = self.range {
            request = request.header(RANGE, format!("{from}-{to}"));
        }
        if !prefer.is_empty() {
            request = request.header("Prefer", prefer.join(", "));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);
        let text = response.text().await?;

        if !status.is_success() {
            return Err(provider_error(self.table, status, &text, single_object));
        }

        Ok((text, total))
    }
}

/// Parse the exact total out of a `Content-Range` header (`0-19/57`).
///
/// Returns `None` for an unknown total (`0-19/*`).
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.parse().ok()
}

/// Map a non-success provider response onto the error taxonomy.
fn provider_error(
    table: &str,
    status: StatusCode,
    body: &str,
    single_object: bool,
) -> RepositoryError {
    let parsed: Option<ProviderErrorBody> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|e| e.code.clone())
        .unwrap_or_else(|| status.as_u16().to_string());
    let message = parsed
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    // A single-object read with zero rows is the provider's "not found".
    if code == PROVIDER_CODE_NO_ROWS || (single_object && status == StatusCode::NOT_ACCEPTABLE) {
        return RepositoryError::NotFound;
    }
    if code == PROVIDER_CODE_UNIQUE_VIOLATION {
        return RepositoryError::Conflict(message);
    }

    tracing::error!(
        table = %table,
        status = %status,
        code = %code,
        body = %body.chars().take(500).collect::<String>(),
        "hosted database request failed"
    );
    RepositoryError::Provider { code, message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_db() -> Db {
        Db::new(&DatabaseConfig {
            url: "https://db.example.test".to_string(),
            service_key: secrecy::SecretString::from("test-key"),
        })
    }

    fn params<'a>(query: &'a Query<'a>) -> &'a [(String, String)] {
        &query.params
    }

    #[test]
    fn test_eq_and_order_params() {
        let db = test_db();
        let q = db
            .from("stores")
            .eq("is_active", true)
            .eq("area_id", 3)
            .order_desc("created_at");
        assert_eq!(
            params(&q),
            &[
                ("is_active".to_string(), "eq.true".to_string()),
                ("area_id".to_string(), "eq.3".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_contains_ci_escapes_pattern_metacharacters() {
        let db = test_db();
        let q = db.from("stores").contains_ci("name", "100%_books\\");
        assert_eq!(
            params(&q),
            &[(
                "name".to_string(),
                "ilike.%100\\%\\_books\\\\%".to_string()
            )]
        );
    }

    #[test]
    fn test_in_set_formats_parenthesized_list() {
        let db = test_db();
        let q = db.from("stores").in_set("area_id", &[1, 2, 3]);
        assert_eq!(
            params(&q),
            &[("area_id".to_string(), "in.(1,2,3)".to_string())]
        );
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total("0-19/57"), Some(57));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-19/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_provider_error_no_rows_maps_to_not_found() {
        let body = r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned"}"#;
        let err = provider_error("stores", StatusCode::NOT_ACCEPTABLE, body, true);
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn test_provider_error_unique_violation_maps_to_conflict() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint \"stores_name_key\""}"#;
        let err = provider_error("stores", StatusCode::CONFLICT, body, false);
        match err {
            RepositoryError::Conflict(message) => assert!(message.contains("stores_name_key")),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_provider_error_generic() {
        let err = provider_error("stores", StatusCode::INTERNAL_SERVER_ERROR, "boom", false);
        match err {
            RepositoryError::Provider { code, message } => {
                assert_eq!(code, "500");
                assert_eq!(message, "boom");
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }
}
