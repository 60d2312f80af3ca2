//! Primary behavioral classification.
//!
//! The primary path only ever emits `new_user`, `power_user`, or
//! `casual_user`. The remaining labels are overlays derived by the churn
//! and offer components from their own evidence and carried alongside the
//! primary segment, never instead of it.

use crate::config::SegmentationConfig;
use crate::domain::churn::RiskLevel;
use crate::domain::segment::UserSegment;

#[derive(Clone, Debug)]
pub struct SegmentClassifier {
    config: SegmentationConfig,
}

impl SegmentClassifier {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Deterministic decision list, first match wins.
    pub fn classify(&self, account_age_days: i64, usage_signal: u64) -> UserSegment {
        if account_age_days < self.config.new_user_age_days {
            UserSegment::NewUser
        } else if usage_signal > self.config.power_user_usage_signal {
            UserSegment::PowerUser
        } else {
            UserSegment::CasualUser
        }
    }

    /// At-risk overlay on top of the primary segment: a high or critical
    /// churn assessment re-labels the account for targeting purposes.
    pub fn overlay_risk(&self, primary: UserSegment, risk: RiskLevel) -> UserSegment {
        if risk >= RiskLevel::High {
            UserSegment::AtRisk
        } else {
            primary
        }
    }
}
