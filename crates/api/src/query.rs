//! Shared query parameter types and the pagination envelope.

use serde::{Deserialize, Serialize};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Default page size for the arbiter's all-tastings listing.
pub const ADMIN_TASTINGS_PAGE_SIZE: i64 = 50;

/// Hard ceiling on requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page=&limit=`).
///
/// Pages are 1-based; out-of-range values are clamped rather than
/// rejected.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// The requested page, at least 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// The requested page size, clamped to `[1, MAX_PAGE_SIZE]`.
    pub fn limit_or(&self, default: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset implied by page and limit.
    pub fn offset_or(&self, default_limit: i64) -> i64 {
        (self.page() - 1) * self.limit_or(default_limit)
    }
}

/// Pagination metadata embedded in paginated payloads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Build metadata from the request parameters and the total row
    /// count. `totalPages` is 0 when there are no rows.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit_or(DEFAULT_PAGE_SIZE), 20);
        assert_eq!(params.offset_or(DEFAULT_PAGE_SIZE), 0);
    }

    #[test]
    fn test_clamping() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit_or(DEFAULT_PAGE_SIZE), MAX_PAGE_SIZE);

        let params = PaginationParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.offset_or(DEFAULT_PAGE_SIZE), 20);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).total_pages, 2);
    }
}
