//! Tournament formats sharing one load → score → report lifecycle

mod gauntlet;
mod ladder;

use std::future::Future;

use crate::domain::Entrant;
use crate::errors::{Error, Result};
use crate::report::Sheet;
use crate::repository::ScoreRepository;

pub use gauntlet::GauntletTournament;
pub use ladder::LadderTournament;

/// A single-use tournament run
pub trait Tournament {
    fn name(&self) -> &str;

    fn entrants(&self) -> &[Entrant];

    /// Create the entrants, evaluating eligibility where the format has rules for it
    fn load_entrants<R: ScoreRepository>(
        &mut self,
        repo: &R,
        names: &[String],
    ) -> impl Future<Output = Result<()>>;

    /// Fetch and attach every entrant's counted scores
    fn get_all_scores<R: ScoreRepository>(&mut self, repo: &R) -> impl Future<Output = Result<()>>;

    fn report_results(&self) -> Result<Vec<Sheet>>;

    /// Load entrants, collect scores and report, in that order
    fn run<R: ScoreRepository>(
        &mut self,
        repo: &R,
        names: &[String],
    ) -> impl Future<Output = Result<Vec<Sheet>>> {
        async move {
            self.load_entrants(repo, names).await?;
            self.get_all_scores(repo).await?;
            self.report_results()
        }
    }
}

/// Lifecycle position of a tournament; each step unlocks the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Stage {
    Created,
    CatalogFiltered,
    EntrantsLoaded,
    ScoresCollected,
}

impl Stage {
    /// Operation that moves a tournament into this stage
    fn operation(self) -> &'static str {
        match self {
            Stage::Created => "new",
            Stage::CatalogFiltered => "filter_songs_and_charts",
            Stage::EntrantsLoaded => "load_entrants",
            Stage::ScoresCollected => "get_all_scores",
        }
    }

    pub(crate) fn require(self, required: Stage, operation: &'static str) -> Result<()> {
        if self < required {
            return Err(Error::precondition(operation, required.operation()));
        }
        Ok(())
    }
}
