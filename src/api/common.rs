//! Common API utilities and shared types
//!
//! Pagination query parameters and the paginated response envelope shared
//! by the list endpoints. Listings are small enough to page in memory after
//! the role filter has been applied by the service layer.

use serde::{Deserialize, Serialize};

/// Default page number (1-indexed)
pub fn default_page() -> u32 {
    1
}

/// Default page size
pub fn default_page_size() -> u32 {
    20
}

/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Paginated list response
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Slice a full result set into one page
pub fn paginate<T>(items: Vec<T>, query: &PaginationQuery) -> Paginated<T> {
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);

    let total = items.len() as i64;
    let total_pages = (items.len() as u32).div_ceil(page_size).max(1);

    // Widen before multiplying; page * page_size can exceed u32
    let start = (page as u64 - 1).saturating_mul(page_size as u64);
    let items = if start >= items.len() as u64 {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip(start as usize)
            .take(page_size as usize)
            .collect()
    };

    Paginated {
        items,
        total,
        page,
        page_size,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: u32, page_size: u32) -> PaginationQuery {
        PaginationQuery { page, page_size }
    }

    #[test]
    fn test_paginate_slices() {
        let items: Vec<i32> = (1..=25).collect();
        let page = paginate(items, &query(2, 10));
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], &query(5, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_paginate_clamps_inputs() {
        let items: Vec<i32> = (1..=10).collect();
        let page = paginate(items, &query(0, 0));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.items, vec![1]);

        let oversized = paginate(vec![1], &query(1, 10_000));
        assert_eq!(oversized.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_paginate_huge_page_number() {
        let page = paginate(vec![1, 2, 3], &query(u32::MAX, MAX_PAGE_SIZE));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.page, u32::MAX);
    }

    #[test]
    fn test_empty_set_has_one_page() {
        let page = paginate(Vec::<i32>::new(), &query(1, 10));
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total, 0);
    }
}
