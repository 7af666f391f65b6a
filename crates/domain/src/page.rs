/// One-based page of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    /// Cuts the requested page out of a complete, already filtered listing.
    #[must_use]
    pub fn slice<T: Clone>(&self, items: &[T]) -> Page<T> {
        let page_size = self.page_size.max(1) as usize;
        let start = (self.page.max(1) as usize - 1) * page_size;
        Page {
            items: items.iter().skip(start).take(page_size).cloned().collect(),
            page: self.page.max(1),
            total_pages: u32::try_from(items.len().div_ceil(page_size)).unwrap_or(u32::MAX),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
