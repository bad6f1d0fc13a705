use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

use crate::domain::{ChartId, Score, timestamps};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Score,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Score => "score",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filter criteria for one entrant's scores
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreQuery {
    pub entrant: String,
    /// Inclusive lower bound on submission time
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on submission time
    pub end: Option<DateTime<Utc>>,
    pub score_gte: Option<i64>,
    pub score_lte: Option<i64>,
    pub difficulties: Option<Vec<i32>>,
    pub difficulty_name: Option<String>,
    pub chart_ids: Option<Vec<ChartId>>,
    pub sort: Option<(SortField, SortOrder)>,
    /// Server reduces to one best score per chart
    pub max_only: bool,
    pub take: Option<usize>,
}

impl ScoreQuery {
    pub fn for_entrant(entrant: impl Into<String>) -> Self {
        Self {
            entrant: entrant.into(),
            ..Self::default()
        }
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn min_score(mut self, score: i64) -> Self {
        self.score_gte = Some(score);
        self
    }

    pub fn difficulties(mut self, difficulties: Vec<i32>) -> Self {
        self.difficulties = Some(difficulties);
        self
    }

    pub fn difficulty_name(mut self, name: Option<String>) -> Self {
        self.difficulty_name = name;
        self
    }

    pub fn charts(mut self, chart_ids: Vec<ChartId>) -> Self {
        self.chart_ids = Some(chart_ids);
        self
    }

    pub fn sorted(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = Some((field, order));
        self
    }

    pub fn best_per_chart(mut self) -> Self {
        self.max_only = true;
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    /// Wire parameters for the scores endpoint, without the page window
    pub fn to_params(&self) -> Value {
        let mut params = Map::new();
        params.insert("gamer.username".to_string(), json!(self.entrant));

        if let Some(range) = Self::range(
            self.start.map(|ts| json!(timestamps::to_api_string(&ts))),
            self.end.map(|ts| json!(timestamps::to_api_string(&ts))),
        ) {
            params.insert("created_at".to_string(), range);
        }
        if let Some(range) = Self::range(self.score_gte.map(|s| json!(s)), self.score_lte.map(|s| json!(s))) {
            params.insert("score".to_string(), range);
        }
        if let Some(difficulties) = &self.difficulties {
            params.insert("chart.difficulty".to_string(), json!(difficulties));
        }
        if let Some(name) = &self.difficulty_name {
            params.insert("chart.difficulty_name".to_string(), json!(name));
        }
        if let Some(chart_ids) = &self.chart_ids {
            params.insert("chart.id".to_string(), json!(chart_ids));
        }
        if let Some((field, order)) = self.sort {
            params.insert("_sort".to_string(), json!(field.as_str()));
            params.insert("_order".to_string(), json!(order.as_str()));
        }
        if self.max_only {
            params.insert("_group_by".to_string(), json!("song_chart_id"));
        }

        Value::Object(params)
    }

    /// Whether a score satisfies every filter of this query
    pub fn matches(&self, score: &Score) -> bool {
        score.entrant() == self.entrant
            && self.start.is_none_or(|start| score.created_at >= start)
            && self.end.is_none_or(|end| score.created_at <= end)
            && self.score_gte.is_none_or(|min| score.score >= min)
            && self.score_lte.is_none_or(|max| score.score <= max)
            && self
                .difficulties
                .as_ref()
                .is_none_or(|ds| ds.contains(&score.chart.difficulty))
            && self
                .difficulty_name
                .as_deref()
                .is_none_or(|name| score.chart.tier_starts_with(name))
            && self
                .chart_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&score.chart_id()))
    }

    fn range(gte: Option<Value>, lte: Option<Value>) -> Option<Value> {
        if gte.is_none() && lte.is_none() {
            return None;
        }
        let mut range = Map::new();
        if let Some(gte) = gte {
            range.insert("gte".to_string(), gte);
        }
        if let Some(lte) = lte {
            range.insert("lte".to_string(), lte);
        }
        Some(Value::Object(range))
    }
}
