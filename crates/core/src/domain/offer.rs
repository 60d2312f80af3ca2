use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::UserId;
use super::segment::UserSegment;
use super::Priority;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferKind {
    Discount,
    TrialExtension,
    FeatureUnlock,
    BonusCredits,
}

impl OfferKind {
    pub fn slug(&self) -> &'static str {
        match self {
            OfferKind::Discount => "discount",
            OfferKind::TrialExtension => "trial_extension",
            OfferKind::FeatureUnlock => "feature_unlock",
            OfferKind::BonusCredits => "bonus_credits",
        }
    }
}

/// Time-boxed, segment-targeted promotional incentive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedOffer {
    /// Stable across evaluations for the same `(rule, user)` pair so the
    /// notification surface can dedupe instead of spamming.
    pub id: String,
    pub kind: OfferKind,
    pub title: String,
    pub description: String,
    pub value: Decimal,
    pub original_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub discount_percentage: Option<u8>,
    pub valid_until: DateTime<Utc>,
    pub conditions: Vec<String>,
    pub target_segment: UserSegment,
    pub priority: Priority,
    /// 0..=100 expected conversion rate.
    pub estimated_conversion: u8,
}

/// Derives the stable offer id from the rule slug and the user id.
pub fn offer_id(rule: &str, user_id: &UserId) -> String {
    let digest = blake3::hash(format!("offer:{rule}:{user_id}").as_bytes());
    format!("off_{}", &digest.to_hex().as_str()[..16])
}
