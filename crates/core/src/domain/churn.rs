use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Priority;

/// Whether a factor protects the account or pushes it toward churn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorImpact {
    /// Protective, lowers the risk score.
    Positive,
    /// Aggravating, raises the risk score.
    Negative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnFactorKind {
    UsageDecline,
    LowEngagement,
    LimitedFeatureUsage,
    GrowingUsage,
}

impl ChurnFactorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnFactorKind::UsageDecline => "usage_decline",
            ChurnFactorKind::LowEngagement => "low_engagement",
            ChurnFactorKind::LimitedFeatureUsage => "limited_feature_usage",
            ChurnFactorKind::GrowingUsage => "growing_usage",
        }
    }
}

/// One weighted contribution to the risk score. Weights are signed and
/// unbounded; only the final score is clamped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChurnFactor {
    pub kind: ChurnFactorKind,
    pub impact: FactorImpact,
    pub weight: f64,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Deterministic step function over the clamped score.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            RiskLevel::Critical
        } else if score >= 50.0 {
            RiskLevel::High
        } else if score >= 30.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionActionKind {
    Discount,
    Education,
    Support,
}

/// Concrete mitigation proposed against a churn risk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetentionAction {
    pub kind: RetentionActionKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// 0..=100 estimated retention impact.
    pub estimated_impact: u8,
    pub cost: Option<Decimal>,
}

/// Scored churn likelihood with contributing factors and mitigations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChurnRiskAssessment {
    pub risk_level: RiskLevel,
    /// Clamped to 0..=100 even when factor weights sum outside that range.
    pub score: f64,
    pub factors: Vec<ChurnFactor>,
    pub retention_actions: Vec<RetentionAction>,
    pub time_to_churn_days: Option<u32>,
    /// 0..=100. Currently a fixed constant; the model does not yet derive
    /// assessment confidence from data quality.
    pub confidence: u8,
}

#[cfg(test)]
mod tests {
    use super::RiskLevel;

    #[test]
    fn risk_level_boundaries_are_exact() {
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(69.999), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(29.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }
}
