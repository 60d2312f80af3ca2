//! Tier-change recommendations: three independent candidates (upgrade,
//! downgrade, pause) accumulate confidence from weighted signals and are
//! emitted once their threshold is met.

use chrono::{DateTime, Duration, Utc};

use crate::config::PricingConfig;
use crate::domain::account::{AccountSnapshot, ResourceKind, Tier};
use crate::domain::recommendation::{
    BillingInterval, RecommendationKind, SubscriptionRecommendation, Urgency,
};
use crate::domain::segment::UserSegment;
use crate::domain::usage::UsagePatterns;

const UPGRADE_THRESHOLD: u8 = 40;
const DOWNGRADE_THRESHOLD: u8 = 50;
const PAUSE_THRESHOLD: u8 = 50;

const UPGRADE_VALID_DAYS: i64 = 7;
const DOWNGRADE_VALID_DAYS: i64 = 30;
const PAUSE_VALID_DAYS: i64 = 14;

/// Confidence accumulator. Signal weights sum, so the total is independent
/// of evaluation order; the reasoning list preserves that order anyway.
#[derive(Debug, Default)]
struct SignalTally {
    confidence: u8,
    reasoning: Vec<String>,
}

impl SignalTally {
    fn add(&mut self, weight: u8, reason: impl Into<String>) {
        self.confidence = self.confidence.saturating_add(weight);
        self.reasoning.push(reason.into());
    }
}

#[derive(Clone, Debug)]
pub struct RecommendationEngine {
    pricing: PricingConfig,
}

impl RecommendationEngine {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    /// Evaluates all candidates and returns those over threshold, sorted by
    /// confidence descending.
    pub fn evaluate(
        &self,
        snapshot: &AccountSnapshot,
        patterns: &UsagePatterns,
        segment: UserSegment,
        now: DateTime<Utc>,
    ) -> Vec<SubscriptionRecommendation> {
        let mut recommendations = Vec::new();
        if let Some(upgrade) = self.evaluate_upgrade(snapshot, patterns, segment, now) {
            recommendations.push(upgrade);
        }
        if let Some(downgrade) = self.evaluate_downgrade(snapshot, patterns, now) {
            recommendations.push(downgrade);
        }
        if let Some(pause) = self.evaluate_pause(patterns, snapshot, now) {
            recommendations.push(pause);
        }
        recommendations.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        recommendations
    }

    fn evaluate_upgrade(
        &self,
        snapshot: &AccountSnapshot,
        patterns: &UsagePatterns,
        segment: UserSegment,
        now: DateTime<Utc>,
    ) -> Option<SubscriptionRecommendation> {
        if snapshot.tier != Tier::Free {
            return None;
        }

        let mut tally = SignalTally::default();
        let mut urgency = Urgency::Medium;

        let ai = patterns.metric(ResourceKind::AiRequests);
        if ai.percentage > 80 {
            tally.add(30, format!("AI request usage at {}% of the free limit", ai.percentage));
            urgency = Urgency::High;
        }
        let products = patterns.metric(ResourceKind::Products);
        if products.percentage > 70 {
            tally.add(25, format!("Product slots at {}% of the free limit", products.percentage));
        }
        if patterns.monthly_growth > 0.2 {
            tally.add(
                20,
                format!("Usage grew {:.0}% month over month", patterns.monthly_growth * 100.0),
            );
        }
        if patterns.login_frequency > 4.0 {
            tally.add(
                15,
                format!("Logs in {:.1} times per week", patterns.login_frequency),
            );
        }
        if snapshot.account_age_days(now) > 14 {
            tally.add(10, "Account is past the evaluation period".to_owned());
        }

        if tally.confidence < UPGRADE_THRESHOLD {
            return None;
        }

        let interval = if segment == UserSegment::PriceSensitive {
            BillingInterval::Yearly
        } else {
            BillingInterval::Monthly
        };
        Some(SubscriptionRecommendation {
            kind: RecommendationKind::Upgrade { tier: Tier::Pro, interval },
            confidence: tally.confidence,
            reasoning: tally.reasoning,
            potential_savings: None,
            potential_value: Some(self.pricing.pro_monthly_price),
            urgency,
            valid_until: now + Duration::days(UPGRADE_VALID_DAYS),
        })
    }

    fn evaluate_downgrade(
        &self,
        snapshot: &AccountSnapshot,
        patterns: &UsagePatterns,
        now: DateTime<Utc>,
    ) -> Option<SubscriptionRecommendation> {
        if snapshot.tier != Tier::Pro {
            return None;
        }

        let mut tally = SignalTally::default();
        let ai = patterns.metric(ResourceKind::AiRequests);
        if ai.current < 5 {
            tally.add(30, format!("Only {} AI requests this period", ai.current));
        }
        if patterns.login_frequency < 1.0 {
            tally.add(25, "Less than one login per week".to_owned());
        }
        if patterns.distinct_active_features() < 2 {
            tally.add(20, "Fewer than two features in active use".to_owned());
        }

        if tally.confidence < DOWNGRADE_THRESHOLD {
            return None;
        }
        Some(SubscriptionRecommendation {
            kind: RecommendationKind::Downgrade { tier: Tier::Free },
            confidence: tally.confidence,
            reasoning: tally.reasoning,
            potential_savings: Some(self.pricing.pro_monthly_price),
            potential_value: None,
            urgency: Urgency::Low,
            valid_until: now + Duration::days(DOWNGRADE_VALID_DAYS),
        })
    }

    fn evaluate_pause(
        &self,
        patterns: &UsagePatterns,
        snapshot: &AccountSnapshot,
        now: DateTime<Utc>,
    ) -> Option<SubscriptionRecommendation> {
        let mut tally = SignalTally::default();
        if patterns.login_frequency < 0.5 {
            tally.add(40, "Effectively no logins in recent weeks".to_owned());
        }
        if patterns.metric(ResourceKind::AiRequests).current == 0 {
            tally.add(30, "No AI requests this period".to_owned());
        }

        if tally.confidence < PAUSE_THRESHOLD {
            return None;
        }
        let potential_savings =
            (snapshot.tier == Tier::Pro).then_some(self.pricing.pro_monthly_price);
        Some(SubscriptionRecommendation {
            kind: RecommendationKind::Pause,
            confidence: tally.confidence,
            reasoning: tally.reasoning,
            potential_savings,
            potential_value: None,
            urgency: Urgency::Medium,
            valid_until: now + Duration::days(PAUSE_VALID_DAYS),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Duration;

    use crate::domain::account::{QuotaLimit, ResourceCounters, TierLimits, UserId};
    use crate::domain::usage::{TrendDirection, UsageMetric};

    use super::*;

    fn metric(current: u64, limit: QuotaLimit) -> UsageMetric {
        let percentage = match limit {
            QuotaLimit::Unlimited | QuotaLimit::Capped(0) => 0,
            QuotaLimit::Capped(cap) => (100.0 * current as f64 / cap as f64).round() as u32,
        };
        UsageMetric {
            current,
            limit,
            percentage,
            trend: TrendDirection::Stable,
            weekly_average: current as f64,
            monthly_average: current as f64,
            peak_usage: current,
            projected_monthly: current as f64,
        }
    }

    fn patterns_with(
        tier: Tier,
        ai_current: u64,
        login_frequency: f64,
        monthly_growth: f64,
    ) -> UsagePatterns {
        let limits = TierLimits::for_tier(tier);
        let mut metrics = BTreeMap::new();
        for kind in ResourceKind::ALL {
            let current = if kind == ResourceKind::AiRequests { ai_current } else { 0 };
            metrics.insert(kind, metric(current, limits.get(kind)));
        }
        UsagePatterns {
            metrics,
            login_frequency,
            feature_usage: Default::default(),
            time_of_day_usage: [0; 24],
            weekly_trends: Vec::new(),
            monthly_growth,
        }
    }

    fn snapshot(tier: Tier, age_days: i64, ai_current: u64) -> AccountSnapshot {
        AccountSnapshot {
            user_id: UserId(uuid::Uuid::from_u128(9)),
            tier,
            created_at: Utc::now() - Duration::days(age_days),
            counters: ResourceCounters { ai_requests: ai_current, ..Default::default() },
        }
    }

    fn engine() -> RecommendationEngine {
        RecommendationEngine::new(PricingConfig::default())
    }

    #[test]
    fn heavy_free_account_gets_high_urgency_upgrade() {
        // AI 85/100, growth 25%, 5 logins/week, 20-day-old account:
        // 30 + 20 + 15 + 10 = 75.
        let snapshot = snapshot(Tier::Free, 20, 85);
        let patterns = patterns_with(Tier::Free, 85, 5.0, 0.25);
        let recommendations =
            engine().evaluate(&snapshot, &patterns, UserSegment::CasualUser, Utc::now());

        let upgrade = recommendations
            .iter()
            .find(|rec| matches!(rec.kind, RecommendationKind::Upgrade { .. }))
            .expect("upgrade must be emitted");
        assert_eq!(upgrade.confidence, 75);
        assert_eq!(upgrade.urgency, Urgency::High);
        assert_eq!(upgrade.reasoning.len(), 4);
        assert!(matches!(
            upgrade.kind,
            RecommendationKind::Upgrade { interval: BillingInterval::Monthly, .. }
        ));
    }

    #[test]
    fn price_sensitive_upgrades_prefer_yearly_billing() {
        let snapshot = snapshot(Tier::Free, 20, 85);
        let patterns = patterns_with(Tier::Free, 85, 5.0, 0.25);
        let recommendations =
            engine().evaluate(&snapshot, &patterns, UserSegment::PriceSensitive, Utc::now());
        assert!(matches!(
            recommendations[0].kind,
            RecommendationKind::Upgrade { interval: BillingInterval::Yearly, .. }
        ));
    }

    #[test]
    fn upgrade_never_fires_for_pro_accounts() {
        let snapshot = snapshot(Tier::Pro, 200, 85);
        let patterns = patterns_with(Tier::Pro, 85, 6.0, 0.5);
        let recommendations =
            engine().evaluate(&snapshot, &patterns, UserSegment::PowerUser, Utc::now());
        assert!(!recommendations
            .iter()
            .any(|rec| matches!(rec.kind, RecommendationKind::Upgrade { .. })));
    }

    #[test]
    fn below_threshold_upgrade_signals_are_suppressed() {
        // Only account age triggers: 10 < 40.
        let snapshot = snapshot(Tier::Free, 60, 10);
        let patterns = patterns_with(Tier::Free, 10, 2.0, 0.0);
        let recommendations =
            engine().evaluate(&snapshot, &patterns, UserSegment::CasualUser, Utc::now());
        assert!(!recommendations
            .iter()
            .any(|rec| matches!(rec.kind, RecommendationKind::Upgrade { .. })));
    }

    #[test]
    fn idle_account_gets_pause_recommendation() {
        // 0.2 logins/week and zero AI requests: 40 + 30 = 70.
        let snapshot = snapshot(Tier::Free, 90, 0);
        let patterns = patterns_with(Tier::Free, 0, 0.2, 0.0);
        let recommendations =
            engine().evaluate(&snapshot, &patterns, UserSegment::CasualUser, Utc::now());

        let pause = recommendations
            .iter()
            .find(|rec| rec.kind == RecommendationKind::Pause)
            .expect("pause must be emitted");
        assert_eq!(pause.confidence, 70);
    }

    #[test]
    fn dormant_pro_account_gets_downgrade_with_savings() {
        let snapshot = snapshot(Tier::Pro, 200, 2);
        let patterns = patterns_with(Tier::Pro, 2, 0.8, -0.1);
        let recommendations =
            engine().evaluate(&snapshot, &patterns, UserSegment::CasualUser, Utc::now());

        let downgrade = recommendations
            .iter()
            .find(|rec| matches!(rec.kind, RecommendationKind::Downgrade { .. }))
            .expect("downgrade must be emitted");
        // 30 (low AI) + 25 (rare logins) + 20 (narrow feature use) = 75.
        assert_eq!(downgrade.confidence, 75);
        assert_eq!(downgrade.potential_savings, Some(PricingConfig::default().pro_monthly_price));
    }

    #[test]
    fn results_are_sorted_by_confidence_descending() {
        // Dormant pro account triggers downgrade (75) and pause (70).
        let snapshot = snapshot(Tier::Pro, 200, 0);
        let patterns = patterns_with(Tier::Pro, 0, 0.2, 0.0);
        let recommendations =
            engine().evaluate(&snapshot, &patterns, UserSegment::CasualUser, Utc::now());

        assert!(recommendations.len() >= 2);
        for pair in recommendations.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn signal_accumulation_is_order_independent() {
        let mut forward = SignalTally::default();
        forward.add(30, "a");
        forward.add(20, "b");
        forward.add(15, "c");

        let mut reversed = SignalTally::default();
        reversed.add(15, "c");
        reversed.add(20, "b");
        reversed.add(30, "a");

        assert_eq!(forward.confidence, reversed.confidence);
    }
}
