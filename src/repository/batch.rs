use futures::stream::{self, StreamExt};
use log::error;
use std::future::Future;

use super::progress::BatchProgress;
use crate::errors::{Error, Result};

/// Run every query of a batch, at most `max_concurrency` at a time.
///
/// Results come back in input order. A failed query never cancels its siblings.
pub async fn run_batch<I, Fut, T>(label: &str, queries: I, max_concurrency: usize) -> Vec<Result<T>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T>>,
{
    let queries: Vec<Fut> = queries.into_iter().collect();
    let mut progress = BatchProgress::new(label, queries.len());

    stream::iter(queries)
        .buffered(max_concurrency.max(1))
        .inspect(|result| progress.record(result.is_ok()))
        .collect()
        .await
}

/// Pair batch results with their keys, failing with every failed key if any query failed
pub fn collect_batch<T>(keys: &[String], results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut values = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for (key, result) in keys.iter().zip(results) {
        match result {
            Ok(value) => values.push(value),
            Err(e) => {
                error!("Query for {} failed: {}", key, e);
                failures.push((key.clone(), e));
            }
        }
    }

    if failures.is_empty() {
        Ok(values)
    } else {
        Err(Error::Batch { failures })
    }
}
