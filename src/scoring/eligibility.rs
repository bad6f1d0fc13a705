use chrono::{DateTime, Utc};

use crate::api::ScoreQuery;
use crate::domain::{Eligibility, EligibilityRequirement, Entrant};
use crate::errors::Result;
use crate::repository::{ScoreRepository, collect_batch, run_batch};

/// Exclusive upper bound on chart difficulty
pub const MAX_DIFFICULTY: i32 = 26;

/// Pre-event clears of `requirement` by `entrant`, capped at the disqualifying count
pub fn requirement_query(
    entrant: &str,
    requirement: &EligibilityRequirement,
    start_date: DateTime<Utc>,
) -> ScoreQuery {
    ScoreQuery::for_entrant(entrant)
        .difficulties((requirement.difficulty..MAX_DIFFICULTY).collect())
        .min_score(requirement.score)
        .until(start_date)
        .take(requirement.count)
}

/// Eligible while the entrant has fewer than `count` qualifying clears
pub fn evaluate(requirement: &EligibilityRequirement, prior_clears: usize) -> Eligibility {
    Eligibility {
        eligible: prior_clears < requirement.count,
        requirement: Some(*requirement),
    }
}

/// Build every entrant with its eligibility frozen, one query per entrant per requirement
pub async fn evaluate_entrants<R: ScoreRepository>(
    repo: &R,
    names: &[String],
    requirements: &[EligibilityRequirement],
    start_date: DateTime<Utc>,
    max_concurrency: usize,
) -> Result<Vec<Entrant>> {
    if requirements.is_empty() {
        return Ok(names.iter().map(Entrant::unconditional).collect());
    }

    let checks: Vec<(&EligibilityRequirement, ScoreQuery)> = names
        .iter()
        .flat_map(|name| {
            requirements
                .iter()
                .map(move |requirement| (requirement, requirement_query(name, requirement, start_date)))
        })
        .collect();

    let results = run_batch(
        "eligibility",
        checks.iter().map(|(_, query)| repo.query_scores(query)),
        max_concurrency,
    )
    .await;
    let keys: Vec<String> = checks
        .iter()
        .map(|(requirement, query)| format!("{} (difficulty {}+)", query.entrant, requirement.difficulty))
        .collect();
    let clears = collect_batch(&keys, results)?;

    let mut evaluations = checks
        .iter()
        .zip(clears)
        .map(|((requirement, _), scores)| evaluate(requirement, scores.len()));

    Ok(names
        .iter()
        .map(|name| Entrant::new(name.as_str(), evaluations.by_ref().take(requirements.len()).collect()))
        .collect())
}
