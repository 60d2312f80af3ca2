use serde::{Deserialize, Serialize};

/// Behavioral classification of an account. Exactly one segment per
/// evaluation; the label may change between calls as inputs change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSegment {
    NewUser,
    PowerUser,
    CasualUser,
    AtRisk,
    HighValue,
    PriceSensitive,
}

impl UserSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserSegment::NewUser => "new_user",
            UserSegment::PowerUser => "power_user",
            UserSegment::CasualUser => "casual_user",
            UserSegment::AtRisk => "at_risk",
            UserSegment::HighValue => "high_value",
            UserSegment::PriceSensitive => "price_sensitive",
        }
    }

    pub fn profile(&self) -> SegmentProfile {
        let (characteristics, typical_behavior, recommended_strategy) = match self {
            UserSegment::NewUser => (
                "Account under 30 days old, still exploring the product",
                "Sporadic sessions, few features touched, low resource usage",
                "Onboard aggressively and discount the first paid month",
            ),
            UserSegment::PowerUser => (
                "Sustained heavy usage across multiple resources",
                "Daily logins, broad feature coverage, near-limit consumption",
                "Protect the relationship and surface higher tiers early",
            ),
            UserSegment::CasualUser => (
                "Established account with modest, steady usage",
                "A few sessions per week inside a narrow feature set",
                "Nudge toward underused features before pitching upgrades",
            ),
            UserSegment::AtRisk => (
                "Declining engagement with churn indicators present",
                "Falling usage trends, rare logins, shrinking feature set",
                "Lead with retention offers and proactive check-ins",
            ),
            UserSegment::HighValue => (
                "Paying account with strong, growing consumption",
                "Consistent heavy usage well inside paid limits",
                "Invest in success touchpoints, avoid discount noise",
            ),
            UserSegment::PriceSensitive => (
                "Responds to discounts more than to feature depth",
                "Usage clusters around promo windows and free allowances",
                "Favor yearly billing and targeted price incentives",
            ),
        };
        SegmentProfile {
            segment: *self,
            characteristics: characteristics.to_owned(),
            typical_behavior: typical_behavior.to_owned(),
            recommended_strategy: recommended_strategy.to_owned(),
        }
    }
}

/// Segment label plus its descriptive strings, as surfaced to consumers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentProfile {
    pub segment: UserSegment,
    pub characteristics: String,
    pub typical_behavior: String,
    pub recommended_strategy: String,
}
