use log::debug;
use std::collections::HashSet;
use std::sync::Mutex;

use super::ScoreRepository;
use crate::api::{ScoreQuery, SortField, SortOrder};
use crate::catalog::Catalog;
use crate::domain::Score;
use crate::errors::{Error, Result};
use crate::scoring::best_per_chart;

/// In-process score repository applying the same query semantics as the scores API
pub struct MemoryRepository {
    catalog: Catalog,
    scores: Vec<Score>,
    unreachable: HashSet<String>,
    queries: Mutex<Vec<ScoreQuery>>,
}

impl MemoryRepository {
    pub fn new(catalog: Catalog, scores: Vec<Score>) -> Self {
        Self {
            catalog,
            scores,
            unreachable: HashSet::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Fail every query for `entrant` with a transport error
    pub fn with_unreachable(mut self, entrant: impl Into<String>) -> Self {
        self.unreachable.insert(entrant.into());
        self
    }

    /// Queries received so far, in arrival order
    pub fn recorded_queries(&self) -> Vec<ScoreQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    fn record(&self, query: &ScoreQuery) {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
    }
}

impl ScoreRepository for MemoryRepository {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    async fn query_scores(&self, query: &ScoreQuery) -> Result<Vec<Score>> {
        self.record(query);
        if self.unreachable.contains(&query.entrant) {
            return Err(Error::Transport {
                url: "memory://scores".to_string(),
                attempts: 1,
                reason: format!("{} is unreachable", query.entrant),
            });
        }

        let mut matched: Vec<Score> = self
            .scores
            .iter()
            .filter(|score| query.matches(score))
            .cloned()
            .collect();

        if let Some((field, order)) = query.sort {
            sort_scores(&mut matched, field, order);
        }
        if query.max_only {
            matched = best_per_chart(matched);
        }
        if let Some(take) = query.take {
            matched.truncate(take);
        }

        debug!("Returned {} scores for entrant_name={:?}", matched.len(), query.entrant);
        Ok(matched)
    }
}

fn sort_scores(scores: &mut [Score], field: SortField, order: SortOrder) {
    scores.sort_by(|a, b| {
        let ordering = match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Score => a.score.cmp(&b.score),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::tests::{chart, song};
    use crate::domain::{Chart, Gamer, timestamps::parse_timestamp};

    /// A score on `chart` by `entrant`, submitted at `at`
    pub(crate) fn score(id: i64, entrant: &str, chart: &Chart, value: i64, at: &str) -> Score {
        Score {
            id,
            gamer: Gamer {
                id: None,
                username: entrant.to_string(),
            },
            chart: chart.clone(),
            song: song(chart.song_id, &format!("Song {}", chart.song_id), None),
            score: value,
            created_at: parse_timestamp(at).unwrap(),
        }
    }

    fn repository() -> MemoryRepository {
        let a = chart(1, 1, 20, "wild");
        let b = chart(2, 2, 23, "wild");
        MemoryRepository::new(
            Catalog::new(Vec::new(), vec![a.clone(), b.clone()]),
            vec![
                score(1, "Thaya", &a, 91000, "2024-11-03"),
                score(2, "Thaya", &a, 97000, "2024-11-01"),
                score(3, "Thaya", &b, 88000, "2024-11-02"),
                score(4, "Hamaon", &a, 99000, "2024-11-02"),
            ],
        )
    }

    #[tokio::test]
    async fn test_filters_by_entrant_and_sorts() {
        let repo = repository();
        let query = ScoreQuery::for_entrant("Thaya").sorted(SortField::CreatedAt, SortOrder::Asc);

        let scores = repo.query_scores(&query).await.unwrap();

        let ids: Vec<i64> = scores.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_best_per_chart_and_take() {
        let repo = repository();
        let query = ScoreQuery::for_entrant("Thaya")
            .best_per_chart()
            .sorted(SortField::Score, SortOrder::Desc)
            .take(1);

        let scores = repo.query_scores(&query).await.unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 97000);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_not_error() {
        let repo = repository();

        let scores = repo.query_scores(&ScoreQuery::for_entrant("Nobody")).await.unwrap();

        assert!(scores.is_empty());
        assert_eq!(repo.recorded_queries().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_entrant_fails() {
        let repo = repository().with_unreachable("Hamaon");

        let result = repo.query_scores(&ScoreQuery::for_entrant("Hamaon")).await;

        assert!(matches!(result, Err(Error::Transport { .. })));
    }
}
