use serde::{Deserialize, Serialize};

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` (already ordered) down to the requested 1-based page.
    /// Out-of-range pages come back empty rather than failing.
    pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total = items.len();
        let total_pages = total.div_ceil(per_page);
        let items = items
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// `?page=` query parameter shared by list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<usize>,
}

impl PageParams {
    pub fn number(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}
