use super::eligibility::{Eligibility, EligibilityRequirement};
use super::models::{ChartId, Score};

/// A competitor within one tournament run
#[derive(Debug, Clone)]
pub struct Entrant {
    pub name: String,
    eligibility: Vec<Eligibility>,
    pub scores: Vec<Score>,
}

impl Entrant {
    /// Eligibility is frozen here and never re-evaluated
    pub fn new(name: impl Into<String>, eligibility: Vec<Eligibility>) -> Self {
        Self {
            name: name.into(),
            eligibility,
            scores: Vec::new(),
        }
    }

    pub fn unconditional(name: impl Into<String>) -> Self {
        Self::new(name, vec![Eligibility::unconditional()])
    }

    pub fn can_compete(&self) -> bool {
        self.eligibility.iter().all(|e| e.eligible)
    }

    pub fn eligibility(&self) -> &[Eligibility] {
        &self.eligibility
    }

    /// Requirements this entrant did not pass
    pub fn failed_requirements(&self) -> impl Iterator<Item = &EligibilityRequirement> {
        self.eligibility
            .iter()
            .filter(|e| !e.eligible)
            .filter_map(|e| e.requirement.as_ref())
    }

    pub fn has_scores(&self) -> bool {
        self.scores.iter().any(|score| score.score > 0)
    }

    /// Score value on a chart, 0 when never attempted
    pub fn score_on(&self, chart_id: ChartId) -> i64 {
        self.scores
            .iter()
            .find(|score| score.chart_id() == chart_id)
            .map_or(0, |score| score.score)
    }
}
