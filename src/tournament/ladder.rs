use chrono::{DateTime, Utc};
use log::info;

use super::{Stage, Tournament};
use crate::api::ScoreQuery;
use crate::config::LadderFile;
use crate::config::settings::BatchSettings;
use crate::domain::Entrant;
use crate::errors::Result;
use crate::report::{CellValue, Sheet};
use crate::repository::{ScoreRepository, collect_batch, run_batch};
use crate::scoring::LadderScoring;

const OVERALL_HEADER: [&str; 3] = ["Rank", "Player Name", "Ladder Point Total"];
const DETAIL_HEADER: [&str; 6] = [
    "Player Name",
    "Song",
    "Difficulty Name",
    "Difficulty Value",
    "Score",
    "Ladder Points",
];

/// Open catalog, best score per chart, ranked by difficulty-weighted points
pub struct LadderTournament {
    name: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    scoring: LadderScoring,
    difficulty_name: Option<String>,
    overall_sheet_name: String,
    details_sheet_name: String,
    entrants: Vec<Entrant>,
    stage: Stage,
    max_concurrency: usize,
}

impl LadderTournament {
    pub fn from_file(file: LadderFile) -> Self {
        Self {
            name: file.name,
            start_date: file.start_date,
            end_date: file.end_date,
            scoring: LadderScoring {
                scoring_floor: file.scoring_floor,
                difficulty_scaling: file.ladder_point_scalar,
                num_scores_to_count: file.num_scores_to_count,
            },
            difficulty_name: file.restrict_to_difficulty_name,
            overall_sheet_name: file.overall_results_sheet_name,
            details_sheet_name: file.score_details_sheet_name,
            entrants: Vec::new(),
            stage: Stage::Created,
            max_concurrency: BatchSettings::default().max_concurrency,
        }
    }

    pub fn with_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Entrants with their point totals, highest first; ties keep load order
    pub fn standings(&self) -> Vec<(f64, &Entrant)> {
        let mut standings: Vec<(f64, &Entrant)> = self
            .entrants
            .iter()
            .map(|entrant| (self.scoring.total(&entrant.scores), entrant))
            .collect();
        standings.sort_by(|a, b| b.0.total_cmp(&a.0));
        standings
    }

    fn score_query(&self, entrant: &Entrant) -> ScoreQuery {
        ScoreQuery::for_entrant(entrant.name.as_str())
            .between(self.start_date, self.end_date)
            .difficulty_name(self.difficulty_name.clone())
            .best_per_chart()
    }

    fn overall_sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(self.overall_sheet_name.as_str());
        sheet.set_row(1, OVERALL_HEADER.map(CellValue::from).to_vec());

        for (index, (total, entrant)) in self.standings().into_iter().enumerate() {
            sheet.set_row(
                index + 2,
                vec![
                    CellValue::from(index + 1),
                    CellValue::from(entrant.name.as_str()),
                    CellValue::from(total),
                ],
            );
        }
        sheet
    }

    fn details_sheet(&self) -> Sheet {
        let mut sheet = Sheet::new(self.details_sheet_name.as_str());
        sheet.set_row(1, DETAIL_HEADER.map(CellValue::from).to_vec());

        let counted = self.entrants.iter().flat_map(|entrant| {
            self.scoring
                .counted_scores(&entrant.scores)
                .into_iter()
                .map(move |(score, points)| (entrant, score, points))
        });
        for (index, (entrant, score, points)) in counted.enumerate() {
            sheet.set_row(
                index + 2,
                vec![
                    CellValue::from(entrant.name.as_str()),
                    CellValue::from(score.song.title.as_str()),
                    CellValue::from(score.chart.tier_label()),
                    CellValue::from(score.chart.difficulty),
                    CellValue::from(score.score),
                    CellValue::from(points),
                ],
            );
        }
        sheet
    }
}

impl Tournament for LadderTournament {
    fn name(&self) -> &str {
        &self.name
    }

    fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    async fn load_entrants<R: ScoreRepository>(&mut self, _repo: &R, names: &[String]) -> Result<()> {
        self.entrants = names.iter().map(Entrant::unconditional).collect();
        self.stage = Stage::EntrantsLoaded;
        info!("{}: {} entrants", self.name, self.entrants.len());
        Ok(())
    }

    async fn get_all_scores<R: ScoreRepository>(&mut self, repo: &R) -> Result<()> {
        self.stage.require(Stage::EntrantsLoaded, "get_all_scores")?;

        let queries: Vec<ScoreQuery> = self.entrants.iter().map(|e| self.score_query(e)).collect();
        let results = run_batch(
            &self.name,
            queries.iter().map(|query| repo.query_scores(query)),
            self.max_concurrency,
        )
        .await;
        let keys: Vec<String> = queries.iter().map(|query| query.entrant.clone()).collect();
        let all_scores = collect_batch(&keys, results)?;

        for (entrant, scores) in self.entrants.iter_mut().zip(all_scores) {
            entrant.scores = scores;
        }
        self.stage = Stage::ScoresCollected;
        Ok(())
    }

    /// Overall standings sheet followed by the per-score breakdown
    fn report_results(&self) -> Result<Vec<Sheet>> {
        self.stage.require(Stage::ScoresCollected, "report_results")?;
        Ok(vec![self.overall_sheet(), self.details_sheet()])
    }
}
