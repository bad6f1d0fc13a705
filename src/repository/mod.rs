//! Score Repository: the query surface the tournaments run against

mod batch;
mod memory;
mod progress;
mod smx;

use std::future::Future;

use crate::api::ScoreQuery;
use crate::catalog::Catalog;
use crate::domain::Score;
use crate::errors::Result;

pub use batch::{collect_batch, run_batch};
pub use memory::MemoryRepository;
pub use progress::BatchProgress;
pub use smx::SmxRepository;

#[cfg(test)]
pub(crate) use memory::tests::score;

/// Source of scores plus the catalog snapshot they refer to
pub trait ScoreRepository {
    /// Full song/chart catalog loaded when the repository was built
    fn catalog(&self) -> &Catalog;

    /// Every score matching `query`. An empty list means no data, never a failure.
    fn query_scores(&self, query: &ScoreQuery) -> impl Future<Output = Result<Vec<Score>>>;
}
