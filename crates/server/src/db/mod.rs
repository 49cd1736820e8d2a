//! Data access against the hosted database service.
//!
//! All persistence is delegated to a hosted PostgREST service; there is no
//! local database. [`client::Db`] is the transport (filters, ordering, range
//! pagination, exact counts), and one repository per table owns the
//! table-specific queries:
//!
//! - `stores` - store rows plus the `store_category_tags` join table
//! - `areas` - geographic areas
//! - `categories` - legacy single-FK classifications
//! - `category_tags` - reusable labels attached via the join table

pub mod areas;
pub mod categories;
pub mod category_tags;
pub mod client;
pub mod stores;

use thiserror::Error;

pub use areas::AreaRepository;
pub use categories::CategoryRepository;
pub use category_tags::CategoryTagRepository;
pub use client::Db;
pub use stores::StoreRepository;

/// Provider error code for "single object requested, zero rows returned".
pub const PROVIDER_CODE_NO_ROWS: &str = "PGRST116";

/// Provider error code for a unique constraint violation.
pub const PROVIDER_CODE_UNIQUE_VIOLATION: &str = "23505";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Transport-level failure talking to the hosted service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The hosted service rejected the request.
    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique name).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The service returned a payload we could not decode.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
