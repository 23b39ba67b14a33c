use serde::Serialize;

/// Number of rows shown on a grid page unless the grid overrides it.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Page selection for list queries. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Page metadata returned alongside a page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub last_page: usize,
}

impl Paginated {
    pub fn new(pagination: Pagination, total: usize) -> Self {
        let last_page = total.div_ceil(pagination.per_page).max(1);
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total,
            last_page,
        }
    }
}
