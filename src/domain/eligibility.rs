use serde::{Deserialize, Serialize};

/// Disqualify an entrant holding `count` pre-event scores of at least `score`
/// on charts rated `difficulty` or higher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRequirement {
    pub difficulty: i32,
    #[serde(rename = "score_gte", alias = "score")]
    pub score: i64,
    #[serde(default = "one")]
    pub count: usize,
}

/// Outcome of checking one requirement for one entrant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: bool,
    pub requirement: Option<EligibilityRequirement>,
}

impl Eligibility {
    /// Used when a tournament defines no requirements
    pub fn unconditional() -> Self {
        Self {
            eligible: true,
            requirement: None,
        }
    }
}

fn one() -> usize {
    1
}
