mod eligibility;
mod entrant;
pub mod models;
pub mod timestamps;

pub use eligibility::{Eligibility, EligibilityRequirement};
pub use entrant::Entrant;
pub use models::*;
