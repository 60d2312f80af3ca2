use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::UserId;
use super::segment::UserSegment;

/// One multiplicative adjustment recorded for transparency, including
/// explicit no-ops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingFactor {
    pub factor: String,
    pub detail: String,
    /// In `(0, 1]`: discounts shrink the price, `1` is neutral. No markup
    /// factors are defined.
    pub adjustment: Decimal,
}

/// Segment-driven price adjustment for one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicPricing {
    pub user_id: UserId,
    pub base_price: Decimal,
    /// `round2(base_price * adjustment_factor)`, never above the base price.
    pub adjusted_price: Decimal,
    pub adjustment_factor: Decimal,
    pub reasoning: Vec<PricingFactor>,
    pub valid_until: DateTime<Utc>,
    pub segment: UserSegment,
}
