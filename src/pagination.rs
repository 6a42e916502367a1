use serde::{Deserialize, Serialize};

use crate::{error::ApiError, validation::Validator};

pub const MAX_LIMIT: i64 = 100;

/// Keeps `(page - 1) * limit` inside `i64` for every accepted limit.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// `?page=&limit=` query; defaults differ per listing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn meta(&self, total: i64) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
            total,
            pages: (total + self.limit - 1) / self.limit,
        }
    }
}

impl PageQuery {
    pub fn resolve(&self, default_limit: i64) -> Result<Page, ApiError> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(default_limit);
        Validator::new()
            .check(page >= 1, "page", "Page must be at least 1")
            .check(page <= MAX_PAGE, "page", "Page is too large")
            .check(
                (1..=MAX_LIMIT).contains(&limit),
                "limit",
                "Limit must be between 1 and 100",
            )
            .finish()?;
        Ok(Page { page, limit })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_offsets() {
        let p = PageQuery::default().resolve(20).unwrap();
        assert_eq!(p, Page { page: 1, limit: 20 });
        assert_eq!(p.offset(), 0);

        let p = PageQuery { page: Some(3), limit: Some(10) }.resolve(20).unwrap();
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn page_count_rounds_up() {
        let p = Page { page: 1, limit: 20 };
        assert_eq!(p.meta(0).pages, 0);
        assert_eq!(p.meta(20).pages, 1);
        assert_eq!(p.meta(21).pages, 2);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(PageQuery { page: Some(0), limit: None }.resolve(20).is_err());
        assert!(PageQuery { page: None, limit: Some(101) }.resolve(20).is_err());
    }

    #[test]
    fn huge_page_is_a_validation_error() {
        let err = PageQuery { page: Some(i64::MAX), limit: Some(100) }
            .resolve(20)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let last = PageQuery { page: Some(MAX_PAGE), limit: Some(MAX_LIMIT) }
            .resolve(20)
            .unwrap();
        assert!(last.offset() > 0);
    }
}
