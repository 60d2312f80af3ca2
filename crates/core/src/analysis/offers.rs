//! Rule-based personalized offers. Each rule evaluates independently and
//! emits at most one offer; ids are derived from the rule and user so
//! re-evaluation never produces duplicates.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::domain::account::{AccountSnapshot, ResourceKind, Tier};
use crate::domain::offer::{offer_id, OfferKind, PersonalizedOffer};
use crate::domain::segment::UserSegment;
use crate::domain::usage::UsagePatterns;
use crate::domain::Priority;

const NEW_USER_MAX_AGE_DAYS: i64 = 30;
const NEW_USER_VALID_DAYS: i64 = 7;
const HEAVY_USAGE_VALID_DAYS: i64 = 14;
const RETENTION_VALID_DAYS: i64 = 3;

const HEAVY_USAGE_PERCENTAGE: u32 = 70;
const HEAVY_LOGIN_FREQUENCY: f64 = 5.0;
const BONUS_CREDIT_AMOUNT: u32 = 50;

#[derive(Clone, Debug)]
pub struct OfferGenerator {
    pricing: PricingConfig,
}

impl OfferGenerator {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    /// Evaluates every rule against the account. `segment` is the
    /// effective segment, i.e. the primary classification with the at-risk
    /// overlay already applied by the caller's churn evidence.
    pub fn evaluate(
        &self,
        snapshot: &AccountSnapshot,
        patterns: &UsagePatterns,
        segment: UserSegment,
        now: DateTime<Utc>,
    ) -> Vec<PersonalizedOffer> {
        let mut offers = Vec::new();
        if let Some(offer) = self.new_user_discount(snapshot, now) {
            offers.push(offer);
        }
        if let Some(offer) = self.heavy_usage_credits(snapshot, patterns, segment, now) {
            offers.push(offer);
        }
        if let Some(offer) = self.at_risk_retention(snapshot, segment, now) {
            offers.push(offer);
        }
        // Rank map ordering, never lexical comparison of priority names.
        offers.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        offers
    }

    fn new_user_discount(
        &self,
        snapshot: &AccountSnapshot,
        now: DateTime<Utc>,
    ) -> Option<PersonalizedOffer> {
        if snapshot.account_age_days(now) >= NEW_USER_MAX_AGE_DAYS || snapshot.tier != Tier::Free {
            return None;
        }
        let original = self.pricing.pro_monthly_price;
        let discounted = (original * Decimal::new(50, 2)).round_dp(2);
        Some(PersonalizedOffer {
            id: offer_id("new_user_discount", &snapshot.user_id),
            kind: OfferKind::Discount,
            title: "50% off your first Pro month".to_owned(),
            description: "Welcome discount for accounts in their first month".to_owned(),
            value: Decimal::from(50),
            original_price: Some(original),
            discounted_price: Some(discounted),
            discount_percentage: Some(50),
            valid_until: now + Duration::days(NEW_USER_VALID_DAYS),
            conditions: Vec::new(),
            target_segment: UserSegment::NewUser,
            priority: Priority::High,
            estimated_conversion: 25,
        })
    }

    fn heavy_usage_credits(
        &self,
        snapshot: &AccountSnapshot,
        patterns: &UsagePatterns,
        segment: UserSegment,
        now: DateTime<Utc>,
    ) -> Option<PersonalizedOffer> {
        if snapshot.tier != Tier::Free {
            return None;
        }
        let heavy = patterns.metric(ResourceKind::AiRequests).percentage > HEAVY_USAGE_PERCENTAGE
            || patterns.metric(ResourceKind::Products).percentage > HEAVY_USAGE_PERCENTAGE
            || patterns.login_frequency > HEAVY_LOGIN_FREQUENCY;
        if !heavy {
            return None;
        }
        Some(PersonalizedOffer {
            id: offer_id("heavy_usage_credits", &snapshot.user_id),
            kind: OfferKind::BonusCredits,
            title: format!("{BONUS_CREDIT_AMOUNT} bonus AI credits"),
            description: "Extra headroom for an account pushing its free limits".to_owned(),
            value: Decimal::from(BONUS_CREDIT_AMOUNT),
            original_price: None,
            discounted_price: None,
            discount_percentage: None,
            valid_until: now + Duration::days(HEAVY_USAGE_VALID_DAYS),
            conditions: Vec::new(),
            target_segment: segment,
            priority: Priority::Medium,
            estimated_conversion: 40,
        })
    }

    fn at_risk_retention(
        &self,
        snapshot: &AccountSnapshot,
        segment: UserSegment,
        now: DateTime<Utc>,
    ) -> Option<PersonalizedOffer> {
        if segment != UserSegment::AtRisk || snapshot.tier != Tier::Pro {
            return None;
        }
        let original = self.pricing.pro_monthly_price;
        let retention = self.pricing.retention_price;
        let percentage = ((Decimal::ONE - retention / original) * Decimal::from(100))
            .round()
            .to_u8()
            .unwrap_or(0);
        Some(PersonalizedOffer {
            id: offer_id("at_risk_retention", &snapshot.user_id),
            kind: OfferKind::Discount,
            title: "Stay with us for less".to_owned(),
            description: "Reduced Pro price for the next three months".to_owned(),
            value: retention,
            original_price: Some(original),
            discounted_price: Some(retention),
            discount_percentage: Some(percentage),
            valid_until: now + Duration::days(RETENTION_VALID_DAYS),
            conditions: vec!["3 months only".to_owned(), "not combinable".to_owned()],
            target_segment: UserSegment::AtRisk,
            priority: Priority::High,
            estimated_conversion: 60,
        })
    }
}
