use chrono::{DateTime, Utc};
use log::{info, warn};

use super::{Stage, Tournament};
use crate::api::{ScoreQuery, SortField, SortOrder};
use crate::catalog::Catalog;
use crate::config::settings::BatchSettings;
use crate::config::{ChartFilter, GauntletFile};
use crate::domain::{EligibilityRequirement, Entrant};
use crate::errors::Result;
use crate::report::Sheet;
use crate::repository::{ScoreRepository, collect_batch, run_batch};
use crate::scoring::{evaluate_entrants, reduce_attempts};

/// Fixed chart set, best of the first N attempts per chart, reported as a raw score matrix
pub struct GauntletTournament {
    name: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    attempts_to_count: usize,
    requirements: Vec<EligibilityRequirement>,
    chart_filters: Vec<ChartFilter>,
    catalog: Catalog,
    entrants: Vec<Entrant>,
    stage: Stage,
    max_concurrency: usize,
}

impl GauntletTournament {
    pub fn from_file(file: GauntletFile) -> Self {
        let settings = file.config;
        Self {
            name: settings.name,
            start_date: settings.start_date,
            end_date: settings.end_date,
            attempts_to_count: settings.attempts_to_count,
            requirements: settings.disqualify_if,
            chart_filters: file.charts,
            catalog: Catalog::default(),
            entrants: Vec::new(),
            stage: Stage::Created,
            max_concurrency: BatchSettings::default().max_concurrency,
        }
    }

    pub fn with_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Narrow the full catalog to the configured charts. Restarts the lifecycle.
    pub fn filter_songs_and_charts(&mut self, full: &Catalog) -> Result<()> {
        self.catalog = full.resolve(&self.chart_filters)?;
        self.entrants.clear();
        self.stage = Stage::CatalogFiltered;

        info!(
            "{}: {} songs, {} charts",
            self.name,
            self.catalog.songs().len(),
            self.catalog.charts().len()
        );
        Ok(())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn score_query(&self, entrant: &Entrant) -> ScoreQuery {
        ScoreQuery::for_entrant(entrant.name.as_str())
            .between(self.start_date, self.end_date)
            .charts(self.catalog.chart_ids())
            .sorted(SortField::CreatedAt, SortOrder::Asc)
    }

    fn write_header(&self, sheet: &mut Sheet) {
        sheet.set(1, 2, "Eligible for Ranking");
        for (index, chart) in self.catalog.charts().iter().enumerate() {
            let title = self
                .catalog
                .song_for(chart)
                .map_or("", |song| song.title.as_str());
            sheet.set(1, index + 3, title);
        }
    }

    fn write_row(&self, sheet: &mut Sheet, row: usize, entrant: &Entrant) {
        sheet.set(row, 1, entrant.name.as_str());
        sheet.set(row, 2, entrant.can_compete());
        for (index, chart) in self.catalog.charts().iter().enumerate() {
            sheet.set(row, index + 3, entrant.score_on(chart.id));
        }
    }
}

impl Tournament for GauntletTournament {
    fn name(&self) -> &str {
        &self.name
    }

    fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    async fn load_entrants<R: ScoreRepository>(&mut self, repo: &R, names: &[String]) -> Result<()> {
        self.stage.require(Stage::CatalogFiltered, "load_entrants")?;

        self.entrants = evaluate_entrants(
            repo,
            names,
            &self.requirements,
            self.start_date,
            self.max_concurrency,
        )
        .await?;
        self.stage = Stage::EntrantsLoaded;

        for entrant in &self.entrants {
            for requirement in entrant.failed_requirements() {
                info!(
                    "{}: {} ineligible ({} score(s) >= {} at difficulty {}+)",
                    self.name, entrant.name, requirement.count, requirement.score, requirement.difficulty
                );
            }
        }
        let eligible = self.entrants.iter().filter(|e| e.can_compete()).count();
        info!("{}: {}/{} entrants eligible", self.name, eligible, self.entrants.len());
        Ok(())
    }

    async fn get_all_scores<R: ScoreRepository>(&mut self, repo: &R) -> Result<()> {
        self.stage.require(Stage::EntrantsLoaded, "get_all_scores")?;

        if self.catalog.charts().is_empty() {
            warn!("{}: no charts resolved, skipping score collection", self.name);
            for entrant in &mut self.entrants {
                entrant.scores.clear();
            }
            self.stage = Stage::ScoresCollected;
            return Ok(());
        }

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
            entrant.scores = reduce_attempts(scores, self.attempts_to_count);
        }
        self.stage = Stage::ScoresCollected;
        Ok(())
    }

    /// Eligible entrants first, then ineligible ones, each in load order; entrants without scores are left out
    fn report_results(&self) -> Result<Vec<Sheet>> {
        self.stage.require(Stage::ScoresCollected, "report_results")?;

        let mut sheet = Sheet::new(self.name.as_str());
        self.write_header(&mut sheet);

        let scored = || self.entrants.iter().filter(|entrant| entrant.has_scores());
        let ordered = scored()
            .filter(|entrant| entrant.can_compete())
            .chain(scored().filter(|entrant| !entrant.can_compete()));
        for (offset, entrant) in ordered.enumerate() {
            self.write_row(&mut sheet, offset + 2, entrant);
        }

        Ok(vec![sheet])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{chart, song};
    use crate::config::GauntletSettings;
    use crate::domain::Score;
    use crate::domain::timestamps::parse_timestamp;
    use crate::errors::Error;
    use crate::report::CellValue;
    use crate::repository::{MemoryRepository, score};

    fn filter(title: &str, difficulty: i32) -> ChartFilter {
        ChartFilter {
            title: title.to_string(),
            difficulty,
            difficulty_name: Some("wild".to_string()),
        }
    }

    fn gauntlet(requirements: Vec<EligibilityRequirement>) -> GauntletTournament {
        GauntletTournament::from_file(GauntletFile {
            config: GauntletSettings {
                name: "Wild".to_string(),
                start_date: parse_timestamp("2024-11-01").unwrap(),
                end_date: parse_timestamp("2024-11-13").unwrap(),
                attempts_to_count: 3,
                disqualify_if: requirements,
            },
            charts: vec![filter("Stars", 20), filter("Ring the Alarm", 21), filter("Twin", 22)],
        })
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                song(1, "Stars", None),
                song(2, "Ring the Alarm", None),
                song(3, "Twin", None),
                song(4, "Unused", None),
            ],
            vec![
                chart(1, 1, 20, "wild"),
                chart(2, 2, 21, "wild"),
                chart(3, 3, 22, "wild"),
                chart(4, 4, 20, "wild"),
            ],
        )
    }

    fn attempt(id: i64, entrant: &str, chart_id: i64, value: i64, at: &str) -> Score {
        let catalog = catalog();
        let chart = catalog.charts().iter().find(|c| c.id == chart_id).unwrap().clone();
        score(id, entrant, &chart, value, at)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn test_attempts_on_every_chart_and_absent_entrant() {
        let repo = MemoryRepository::new(
            catalog(),
            vec![
                attempt(1, "Thaya", 1, 91000, "2024-11-02 10:00:00"),
                attempt(2, "Thaya", 2, 88000, "2024-11-02 10:05:00"),
                attempt(3, "Thaya", 3, 80000, "2024-11-02 10:10:00"),
                attempt(4, "Thaya", 1, 95000, "2024-11-03 10:00:00"),
                attempt(5, "Thaya", 1, 96000, "2024-11-03 10:05:00"),
                attempt(6, "Thaya", 1, 99999, "2024-11-03 10:10:00"),
                attempt(7, "Thaya", 4, 99000, "2024-11-03 10:20:00"),
                attempt(8, "Thaya", 2, 99000, "2024-11-20 10:00:00"),
            ],
        );
        let mut tournament = gauntlet(Vec::new());
        tournament.filter_songs_and_charts(repo.catalog()).unwrap();

        let sheets = tournament.run(&repo, &names(&["Thaya", "Hamaon"])).await.unwrap();

        let thaya = &tournament.entrants()[0];
        assert_eq!(thaya.scores.len(), 3);
        assert_eq!(thaya.score_on(1), 96000);
        assert_eq!(thaya.score_on(2), 88000);
        assert!(!tournament.entrants()[1].has_scores());

        let sheet = &sheets[0];
        assert_eq!(sheet.name, "Wild");
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.get(1, 3), Some(&CellValue::from("Stars")));
        assert_eq!(sheet.get(1, 5), Some(&CellValue::from("Twin")));
        assert_eq!(sheet.get(2, 1), Some(&CellValue::from("Thaya")));
        assert_eq!(sheet.get(2, 2), Some(&CellValue::Bool(true)));
        assert_eq!(sheet.get(2, 3), Some(&CellValue::Int(96000)));
    }

    #[tokio::test]
    async fn test_ineligible_rows_follow_eligible_rows() {
        let requirement = EligibilityRequirement {
            difficulty: 21,
            score: 99000,
            count: 1,
        };
        let repo = MemoryRepository::new(
            catalog(),
            vec![
                attempt(1, "Thaya", 3, 99500, "2024-10-01"),
                attempt(2, "Thaya", 1, 90000, "2024-11-02"),
                attempt(3, "Hamaon", 2, 85000, "2024-11-02"),
                attempt(4, "Kren", 3, 0, "2024-11-02"),
            ],
        );
        let mut tournament = gauntlet(vec![requirement]);
        tournament.filter_songs_and_charts(repo.catalog()).unwrap();

        let sheets = tournament
            .run(&repo, &names(&["Thaya", "Hamaon", "Kren"]))
            .await
            .unwrap();

        let sheet = &sheets[0];
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.get(2, 1), Some(&CellValue::from("Hamaon")));
        assert_eq!(sheet.get(3, 1), Some(&CellValue::from("Thaya")));
        assert_eq!(sheet.get(3, 2), Some(&CellValue::Bool(false)));
        assert_eq!(sheet.get(3, 4), Some(&CellValue::Int(0)));
    }

    #[tokio::test]
    async fn test_out_of_order_calls_fail_fast() {
        let repo = MemoryRepository::new(catalog(), Vec::new());
        let mut tournament = gauntlet(Vec::new());

        let error = tournament
            .load_entrants(&repo, &names(&["Thaya"]))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Precondition { required: "filter_songs_and_charts", .. }));

        tournament.filter_songs_and_charts(repo.catalog()).unwrap();
        let error = tournament.get_all_scores(&repo).await.unwrap_err();
        assert!(matches!(error, Error::Precondition { required: "load_entrants", .. }));
        assert!(tournament.report_results().is_err());
        assert!(repo.recorded_queries().is_empty());
    }

    #[tokio::test]
    async fn test_failed_score_query_keeps_stage() {
        let repo = MemoryRepository::new(catalog(), Vec::new()).with_unreachable("Hamaon");
        let mut tournament = gauntlet(Vec::new());
        tournament.filter_songs_and_charts(repo.catalog()).unwrap();
        tournament
            .load_entrants(&repo, &names(&["Thaya", "Hamaon"]))
            .await
            .unwrap();

        let error = tournament.get_all_scores(&repo).await.unwrap_err();

        assert!(matches!(error, Error::Batch { .. }));
        assert!(matches!(
            tournament.report_results(),
            Err(Error::Precondition { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_resolved_charts_issues_no_score_queries() {
        let repo = MemoryRepository::new(catalog(), vec![attempt(1, "Thaya", 4, 99000, "2024-11-02")]);
        let mut tournament = GauntletTournament::from_file(GauntletFile {
            config: GauntletSettings {
                name: "Empty".to_string(),
                start_date: parse_timestamp("2024-11-01").unwrap(),
                end_date: parse_timestamp("2024-11-13").unwrap(),
                attempts_to_count: 3,
                disqualify_if: Vec::new(),
            },
            charts: vec![filter("Unused", 26)],
        });
        tournament.filter_songs_and_charts(repo.catalog()).unwrap();

        let sheets = tournament.run(&repo, &names(&["Thaya"])).await.unwrap();

        assert!(repo.recorded_queries().is_empty());
        assert!(!tournament.entrants()[0].has_scores());
        assert_eq!(sheets[0].row_count(), 1);
    }

    #[test]
    fn test_unknown_song_aborts_setup() {
        let mut tournament = gauntlet(Vec::new());
        let partial = Catalog::new(vec![song(1, "Stars", None)], vec![chart(1, 1, 20, "wild")]);

        let error = tournament.filter_songs_and_charts(&partial).unwrap_err();

        assert!(matches!(error, Error::CatalogResolution { matches: 0, .. }));
    }
}
