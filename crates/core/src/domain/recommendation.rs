use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::Tier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingInterval {
    Monthly,
    Yearly,
}

/// Proposed tier change, modeled as a closed set so new kinds are a
/// compile-time decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RecommendationKind {
    Upgrade { tier: Tier, interval: BillingInterval },
    Downgrade { tier: Tier },
    Pause,
    Maintain,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// One tier-change proposal with its accumulated confidence and the
/// signals that triggered it, in evaluation order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecommendation {
    pub kind: RecommendationKind,
    /// 0..=100, the sum of triggered signal weights.
    pub confidence: u8,
    pub reasoning: Vec<String>,
    pub potential_savings: Option<Decimal>,
    pub potential_value: Option<Decimal>,
    pub urgency: Urgency,
    /// Advisory expiry; the engine does not enforce it.
    pub valid_until: DateTime<Utc>,
}
