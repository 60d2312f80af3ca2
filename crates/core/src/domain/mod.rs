pub mod account;
pub mod churn;
pub mod offer;
pub mod optimization;
pub mod pricing;
pub mod recommendation;
pub mod report;
pub mod segment;
pub mod usage;

use serde::{Deserialize, Serialize};

/// Shared low/medium/high ranking used by offers and retention actions.
/// Ordering goes through `rank()`, never through string comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }
}
