//! Pagination types
//!
//! `ListParams` carries the requested page and page size; `PagedResult`
//! holds one page of items plus the navigation metadata templates and API
//! responses need.
//!
//! Rules:
//! - pages are 1-indexed; a missing, non-numeric or non-positive page is page 1
//! - a page past the end is empty (not an error) and has no next page
//! - `total_pages = ceil(total / per_page)`

use serde::{Deserialize, Serialize};

/// Pagination parameters for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 6,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Build parameters from a raw `page` query value.
    ///
    /// Absent, blank, non-numeric and non-positive values fall back to page 1.
    pub fn parse(raw_page: Option<&str>, per_page: u32) -> Self {
        let page = raw_page
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|page| *page > 0)
            .map(|page| u32::try_from(page).unwrap_or(u32::MAX))
            .unwrap_or(1);
        Self::new(page, per_page)
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.per_page)
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Wrap a page that was already sliced by the database
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Slice one page out of a complete, already ordered sequence
    pub fn from_vec(all: Vec<T>, params: &ListParams) -> Self {
        let total = all.len() as i64;
        let start = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let items: Vec<T> = all
            .into_iter()
            .skip(start)
            .take(params.per_page as usize)
            .collect();
        Self::new(items, total, params)
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 || self.total <= 0 {
            return 0;
        }
        let per_page = i64::from(self.per_page);
        let pages = (self.total + per_page - 1) / per_page;
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Convert the items, keeping the page metadata
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }

    /// Navigation metadata for templates and API responses
    pub fn meta(&self) -> PageMeta {
        let total_pages = self.total_pages();
        PageMeta {
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages,
            has_prev: self.has_prev(),
            has_next: self.has_next(),
            prev_page: if self.has_prev() { Some(self.page - 1) } else { None },
            next_page: if self.has_next() { Some(self.page + 1) } else { None },
            pages: (1..=total_pages).collect(),
        }
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: 6,
        }
    }
}

/// Serializable page navigation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
    /// Page numbers for rendering links
    pub pages: Vec<u32>,
}
