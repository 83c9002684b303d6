//! Page arithmetic shared by the repository and the templates.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Requested page window. `page` is 1-indexed and may be out of range; it is
/// clamped against the actual row count, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Number of pages `total` items span. Never zero, so an empty collection
    /// still has a first page to land on.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    /// The requested page clamped into `[1, page_count]`.
    pub fn clamped_page(&self, total: usize) -> usize {
        self.page.clamp(1, self.page_count(total))
    }

    /// Row offset of the clamped page.
    pub fn offset(&self, total: usize) -> usize {
        (self.clamped_page(total) - 1) * self.per_page
    }
}

/// One page of items together with the numbers templates need to render a
/// pager.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, pages: usize, total: usize) -> Self {
        Self {
            items,
            page,
            pages,
            total,
        }
    }

    /// Package a repository page using the same clamping the query applied.
    pub fn from_page(items: Vec<T>, pagination: &Pagination, total: usize) -> Self {
        Self::new(
            items,
            pagination.clamped_page(total),
            pagination.page_count(total),
            total,
        )
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_zero_clamps_to_first() {
        let pagination = Pagination::new(0, 10);
        assert_eq!(pagination.clamped_page(25), 1);
        assert_eq!(pagination.offset(25), 0);
    }

    #[test]
    fn page_beyond_last_clamps_to_last() {
        let pagination = Pagination::new(99, 10);
        assert_eq!(pagination.clamped_page(25), 3);
        assert_eq!(pagination.offset(25), 20);
    }

    #[test]
    fn empty_collection_still_has_one_page() {
        let pagination = Pagination::new(1, 10);
        assert_eq!(pagination.page_count(0), 1);
        assert_eq!(pagination.offset(0), 0);
    }

    #[test]
    fn twelve_items_split_ten_and_two() {
        let pagination = Pagination::new(2, 10);
        assert_eq!(pagination.page_count(12), 2);
        assert_eq!(pagination.offset(12), 10);
    }
}
