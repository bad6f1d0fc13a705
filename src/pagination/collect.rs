use log::debug;
use std::future::Future;

use super::config::PaginationConfig;
use super::iterator::{PageIterator, PageRequest};
use crate::errors::Result;

/// Fetch pages one after another until the iterator says the query is exhausted
pub async fn collect_pages<T, F, Fut>(config: PaginationConfig, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut pages = PageIterator::new(config);
    let mut records = Vec::new();

    while let Some(request) = pages.next_request() {
        let page = fetch_page(request).await?;
        debug!("  → Page skip={} take={} returned {}", request.skip, request.take, page.len());
        pages.advance(page.len());
        records.extend(page);
    }

    Ok(records)
}
