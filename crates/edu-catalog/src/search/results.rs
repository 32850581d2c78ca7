//! Pagination over filtered and sorted lists.

use serde::{Deserialize, Serialize};

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Requested page (1-indexed, not clamped).
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
    /// Total number of items.
    pub total: usize,
    /// Total number of pages; zero for an empty list.
    pub total_pages: usize,
    /// Whether there's a next page.
    pub has_next: bool,
    /// Whether there's a previous page.
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1 && total_pages > 0,
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Check if the requested page exists.
    pub fn in_range(&self) -> bool {
        self.page >= 1 && self.page <= self.total_pages
    }

    /// Clamp a page number into `1..=total_pages` (1 when there are no pages).
    pub fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages.max(1))
    }

    /// Get page numbers for display (e.g., [3, 4, 5, 6, 7]).
    pub fn page_numbers(&self, max_visible: usize) -> Vec<usize> {
        if self.total_pages <= max_visible {
            return (1..=self.total_pages).collect();
        }
        if max_visible == 0 {
            return Vec::new();
        }

        let half = max_visible / 2;
        let start = self.page.saturating_sub(half).max(1);
        let end = (start + max_visible - 1).min(self.total_pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }

    /// Check if on first page.
    pub fn is_first(&self) -> bool {
        self.page <= 1
    }

    /// Check if on last page.
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    /// Get start item number (1-indexed), zero when the page is empty.
    pub fn start_item(&self) -> usize {
        if self.in_range() {
            self.offset() + 1
        } else {
            0
        }
    }

    /// Get end item number, zero when the page is empty.
    pub fn end_item(&self) -> usize {
        if self.in_range() {
            (self.page * self.per_page).min(self.total)
        } else {
            0
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of pages.
    pub total_pages: usize,
    /// Pagination details.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Slice `list` into 1-based page `page` of `page_size` items.
///
/// Does not clamp: a page beyond the range (or page 0) yields no items.
pub fn paginate<T: Clone>(list: &[T], page: usize, page_size: usize) -> Page<T> {
    let pagination = Pagination::new(page, page_size, list.len());
    let items = if pagination.in_range() {
        let start = pagination.offset();
        let end = (start + page_size).min(list.len());
        list[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        total_pages: pagination.total_pages,
        pagination,
    }
}
