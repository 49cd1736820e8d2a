//! Pagination types shared between the API layer and its clients.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Upper bound on the page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A normalized page request (1-based page number plus page size).
///
/// Degenerate inputs are clamped rather than rejected: page 0 becomes page 1,
/// limit 0 becomes the default, and limits above [`MAX_PAGE_LIMIT`] are capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Normalize raw query values into a page request.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = match limit {
            None | Some(0) => DEFAULT_PAGE_LIMIT,
            Some(l) => l.min(MAX_PAGE_LIMIT),
        };
        Self { page, limit }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Inclusive row index range for this page, as expected by the hosted
    /// database's `Range` header (`from-to`, both inclusive).
    #[must_use]
    pub const fn row_range(&self) -> (u64, u64) {
        let from = (self.page as u64 - 1) * self.limit as u64;
        let to = from + self.limit as u64 - 1;
        (from, to)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub limit: u32,
    /// Exact total row count matching the query.
    pub total: u64,
    /// Number of pages: `ceil(total / limit)`.
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl Pagination {
    /// Build pagination metadata for a served page.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit());
        Self {
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(req.row_range(), (0, 19));
    }

    #[test]
    fn test_page_request_clamps_degenerate_values() {
        let req = PageRequest::new(Some(0), Some(0));
        assert_eq!(req.page(), 1);
        assert_eq!(req.limit(), DEFAULT_PAGE_LIMIT);

        let req = PageRequest::new(Some(2), Some(1000));
        assert_eq!(req.limit(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_row_range_is_inclusive() {
        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.row_range(), (20, 29));
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let req = PageRequest::new(Some(1), Some(20));
        assert_eq!(Pagination::new(req, 0).total_pages, 0);
        assert_eq!(Pagination::new(req, 1).total_pages, 1);
        assert_eq!(Pagination::new(req, 20).total_pages, 1);
        assert_eq!(Pagination::new(req, 21).total_pages, 2);
        assert_eq!(Pagination::new(req, 57).total_pages, 3);
    }

    #[test]
    fn test_pagination_serializes_camel_case_total_pages() {
        let req = PageRequest::new(Some(1), Some(20));
        let json = serde_json::to_value(Pagination::new(req, 57)).expect("serialize");
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["total"], 57);
    }
}
