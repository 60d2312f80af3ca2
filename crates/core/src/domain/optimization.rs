use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Usage,
    Billing,
    Features,
    Workflow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Self-service tip for using the product more efficiently within the
/// current limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub potential_savings: Option<Decimal>,
    pub potential_value: Option<Decimal>,
    pub difficulty: Difficulty,
    pub estimated_time: Option<String>,
    pub steps: Vec<String>,
}
