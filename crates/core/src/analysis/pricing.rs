//! Segment-keyed dynamic pricing. Pure function of the segment and the
//! configured base price; callable without the rest of the report.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::domain::account::UserId;
use crate::domain::pricing::{DynamicPricing, PricingFactor};
use crate::domain::segment::UserSegment;

const PRICING_VALID_DAYS: i64 = 7;

#[derive(Clone, Debug)]
pub struct DynamicPricingEngine {
    pricing: PricingConfig,
}

impl DynamicPricingEngine {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    /// Applies at most one multiplicative factor for the segment. Neutral
    /// segments still record an explanatory factor so the trace is never
    /// empty.
    pub fn price(
        &self,
        user_id: UserId,
        segment: UserSegment,
        now: DateTime<Utc>,
    ) -> DynamicPricing {
        let base_price = self.pricing.pro_monthly_price;
        let factors = vec![segment_factor(segment)];

        let adjustment_factor: Decimal =
            factors.iter().map(|entry| entry.adjustment).product();
        let adjusted_price = (base_price * adjustment_factor).round_dp(2);

        DynamicPricing {
            user_id,
            base_price,
            adjusted_price,
            adjustment_factor,
            reasoning: factors,
            valid_until: now + Duration::days(PRICING_VALID_DAYS),
            segment,
        }
    }
}

fn segment_factor(segment: UserSegment) -> PricingFactor {
    let (factor, detail, adjustment) = match segment {
        UserSegment::NewUser => (
            "new_user_discount",
            "introductory rate for accounts in their first month",
            Decimal::new(70, 2),
        ),
        UserSegment::PowerUser => (
            "power_user_standard",
            "standard rate retained; heavy usage already maximizes plan value",
            Decimal::ONE,
        ),
        UserSegment::PriceSensitive => (
            "price_sensitive_discount",
            "discounted rate for accounts that respond to price incentives",
            Decimal::new(80, 2),
        ),
        UserSegment::AtRisk => (
            "at_risk_retention",
            "retention rate for an account showing churn signals",
            Decimal::new(65, 2),
        ),
        UserSegment::CasualUser | UserSegment::HighValue => (
            "no_segment_adjustment",
            "no discount defined for this segment",
            Decimal::ONE,
        ),
    };
    PricingFactor { factor: factor.to_owned(), detail: detail.to_owned(), adjustment }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn engine() -> DynamicPricingEngine {
        DynamicPricingEngine::new(PricingConfig::default())
    }

    fn user() -> UserId {
        UserId(Uuid::from_u128(11))
    }

    #[test]
    fn new_user_rate_is_seventy_percent_of_base() {
        let pricing = engine().price(user(), UserSegment::NewUser, Utc::now());
        assert_eq!(pricing.base_price, Decimal::new(2900, 2));
        assert_eq!(pricing.adjustment_factor, Decimal::new(70, 2));
        assert_eq!(pricing.adjusted_price, Decimal::new(2030, 2));
    }

    #[test]
    fn power_user_no_op_is_recorded_for_transparency() {
        let pricing = engine().price(user(), UserSegment::PowerUser, Utc::now());
        assert_eq!(pricing.adjusted_price, pricing.base_price);
        assert_eq!(pricing.reasoning.len(), 1);
        assert_eq!(pricing.reasoning[0].factor, "power_user_standard");
    }

    #[test]
    fn every_segment_prices_at_or_below_base() {
        for segment in [
            UserSegment::NewUser,
            UserSegment::PowerUser,
            UserSegment::CasualUser,
            UserSegment::AtRisk,
            UserSegment::HighValue,
            UserSegment::PriceSensitive,
        ] {
            let pricing = engine().price(user(), segment, Utc::now());
            assert!(pricing.adjusted_price <= pricing.base_price, "{segment:?} marked up");
            assert!(pricing.adjustment_factor <= Decimal::ONE);
            assert!(pricing.adjustment_factor > Decimal::ZERO);
            assert!(!pricing.reasoning.is_empty());
        }
    }

    #[test]
    fn at_risk_rate_is_the_deepest_discount() {
        let at_risk = engine().price(user(), UserSegment::AtRisk, Utc::now());
        let price_sensitive = engine().price(user(), UserSegment::PriceSensitive, Utc::now());
        assert!(at_risk.adjusted_price < price_sensitive.adjusted_price);
        assert_eq!(at_risk.adjusted_price, Decimal::new(1885, 2));
    }
}
