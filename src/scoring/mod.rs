//! Eligibility, attempt reduction and ladder points

pub mod eligibility;
pub mod ladder;
pub mod reducer;

pub use eligibility::{MAX_DIFFICULTY, evaluate, evaluate_entrants, requirement_query};
pub use ladder::{LadderScoring, round2};
pub use reducer::{best_per_chart, cap_attempts, reduce_attempts};
