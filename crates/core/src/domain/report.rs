use serde::{Deserialize, Serialize};

use super::account::{Tier, UserId};
use super::churn::ChurnRiskAssessment;
use super::offer::PersonalizedOffer;
use super::optimization::OptimizationSuggestion;
use super::recommendation::SubscriptionRecommendation;
use super::segment::SegmentProfile;
use super::usage::UsagePatterns;

/// The full intelligence report for one account. Produced, consumed, and
/// discarded per request; the engine holds no state between calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionIntelligence {
    pub user_id: UserId,
    pub current_tier: Tier,
    pub segment: SegmentProfile,
    pub usage_patterns: UsagePatterns,
    /// Sorted by confidence, highest first.
    pub recommendations: Vec<SubscriptionRecommendation>,
    pub churn_risk: ChurnRiskAssessment,
    /// Sorted by priority rank, highest first.
    pub personalized_offers: Vec<PersonalizedOffer>,
    pub optimization_suggestions: Vec<OptimizationSuggestion>,
}
