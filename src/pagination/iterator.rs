use super::config::PaginationConfig;

/// `_skip`/`_take` pair for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: usize,
    pub take: usize,
}

/// Skip/take bookkeeping for a sequential paginated query
pub struct PageIterator {
    config: PaginationConfig,
    skip: usize,
    fetched: usize,
    complete: bool,
}

impl PageIterator {
    pub fn new(config: PaginationConfig) -> Self {
        let complete = config.take == Some(0);
        Self {
            config,
            skip: 0,
            fetched: 0,
            complete,
        }
    }

    /// The next request to issue, or `None` once the query is exhausted
    pub fn next_request(&self) -> Option<PageRequest> {
        if self.complete {
            return None;
        }
        Some(PageRequest {
            skip: self.skip,
            take: self.current_take(),
        })
    }

    /// Record how many records the last request returned
    pub fn advance(&mut self, returned: usize) {
        let requested = self.current_take();
        self.fetched += returned;
        self.skip += requested;

        if self.is_short_page(returned, requested) || self.has_reached_take() {
            self.complete = true;
        }
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn current_take(&self) -> usize {
        match self.config.take {
            Some(take) => take.saturating_sub(self.fetched).min(self.config.page_size),
            None => self.config.page_size,
        }
    }

    fn is_short_page(&self, returned: usize, requested: usize) -> bool {
        returned < requested
    }

    fn has_reached_take(&self) -> bool {
        self.config.take.is_some_and(|take| self.fetched >= take)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_below_page_size_is_a_single_request() {
        let pages = PageIterator::new(PaginationConfig::new().with_take(Some(3)));

        assert_eq!(pages.next_request(), Some(PageRequest { skip: 0, take: 3 }));
    }

    #[test]
    fn test_take_is_spread_over_pages() {
        let mut pages = PageIterator::new(PaginationConfig::new().with_take(Some(150)));

        assert_eq!(pages.next_request(), Some(PageRequest { skip: 0, take: 100 }));
        pages.advance(100);
        assert_eq!(pages.next_request(), Some(PageRequest { skip: 100, take: 50 }));
        pages.advance(50);
        assert!(pages.is_complete());
        assert_eq!(pages.fetched(), 150);
    }

    #[test]
    fn test_short_page_ends_query() {
        let mut pages = PageIterator::new(PaginationConfig::new());

        pages.advance(100);
        assert!(!pages.is_complete());
        pages.advance(42);
        assert!(pages.is_complete());
        assert_eq!(pages.next_request(), None);
    }

    #[test]
    fn test_zero_take_issues_nothing() {
        let pages = PageIterator::new(PaginationConfig::new().with_take(Some(0)));

        assert_eq!(pages.next_request(), None);
    }
}
