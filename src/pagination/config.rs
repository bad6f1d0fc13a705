/// Server-side maximum number of records per request
pub const MAX_PAGE_SIZE: usize = 100;

/// Configuration for paginated requests
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub page_size: usize,
    /// Total number of records wanted; `None` fetches everything
    pub take: Option<usize>,
}

impl PaginationConfig {
    pub fn new() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            take: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_take(mut self, take: Option<usize>) -> Self {
        self.take = take;
        self
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::new()
    }
}
