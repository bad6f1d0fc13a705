use std::collections::HashMap;

use crate::domain::{ChartId, Score};

/// Keep the first `attempts_to_count` attempts per chart, then the best of those per chart.
///
/// `scores` must be in ascending submission order. Output holds one score per attempted
/// chart, ordered by each chart's first appearance.
pub fn reduce_attempts(scores: Vec<Score>, attempts_to_count: usize) -> Vec<Score> {
    best_per_chart(cap_attempts(scores, attempts_to_count))
}

/// Drop every attempt past the first `attempts_to_count` on its chart
pub fn cap_attempts(scores: Vec<Score>, attempts_to_count: usize) -> Vec<Score> {
    let mut seen: HashMap<ChartId, usize> = HashMap::new();

    scores
        .into_iter()
        .filter(|score| {
            let attempts = seen.entry(score.chart_id()).or_default();
            let counted = *attempts < attempts_to_count;
            *attempts += 1;
            counted
        })
        .collect()
}

/// Highest score per chart; on a tie the earliest one wins
pub fn best_per_chart(scores: Vec<Score>) -> Vec<Score> {
    let mut best: Vec<Score> = Vec::new();

    for score in scores {
        match best.iter_mut().find(|kept| kept.chart_id() == score.chart_id()) {
            Some(kept) if score.score > kept.score => *kept = score,
            Some(_) => {}
            None => best.push(score),
        }
    }
    best
}
