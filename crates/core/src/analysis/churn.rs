//! Weighted-factor churn model. Factor contributions are unbounded; only
//! the final score is clamped into 0..=100.

use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::domain::churn::{
    ChurnFactor, ChurnFactorKind, ChurnRiskAssessment, FactorImpact, RetentionAction,
    RetentionActionKind, RiskLevel,
};
use crate::domain::usage::UsagePatterns;
use crate::domain::Priority;

const USAGE_DECLINE_WEIGHT: f64 = 30.0;
const LOW_ENGAGEMENT_WEIGHT: f64 = 25.0;
const LIMITED_FEATURES_WEIGHT: f64 = 20.0;
const GROWING_USAGE_WEIGHT: f64 = -15.0;

const DECLINE_FRACTION_THRESHOLD: f64 = 0.3;
const LOW_ENGAGEMENT_LOGINS: f64 = 2.0;
const LIMITED_FEATURES_COUNT: usize = 3;
const GROWTH_PROTECTION_THRESHOLD: f64 = 0.1;

/// The model does not yet derive confidence from data quality; every
/// assessment carries this constant.
const ASSESSMENT_CONFIDENCE: u8 = 70;

#[derive(Clone, Debug)]
pub struct ChurnRiskAssessor {
    pricing: PricingConfig,
}

impl ChurnRiskAssessor {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    pub fn assess(&self, patterns: &UsagePatterns) -> ChurnRiskAssessment {
        let mut factors = Vec::new();

        let declining = patterns.declining_fraction();
        if declining > DECLINE_FRACTION_THRESHOLD {
            factors.push(ChurnFactor {
                kind: ChurnFactorKind::UsageDecline,
                impact: FactorImpact::Negative,
                weight: USAGE_DECLINE_WEIGHT,
                description: format!(
                    "{:.0}% of tracked resources are trending down",
                    declining * 100.0
                ),
            });
        }
        if patterns.login_frequency < LOW_ENGAGEMENT_LOGINS {
            factors.push(ChurnFactor {
                kind: ChurnFactorKind::LowEngagement,
                impact: FactorImpact::Negative,
                weight: LOW_ENGAGEMENT_WEIGHT,
                description: format!(
                    "{:.1} logins per week, below the engagement floor",
                    patterns.login_frequency
                ),
            });
        }
        if patterns.distinct_active_features() < LIMITED_FEATURES_COUNT {
            factors.push(ChurnFactor {
                kind: ChurnFactorKind::LimitedFeatureUsage,
                impact: FactorImpact::Negative,
                weight: LIMITED_FEATURES_WEIGHT,
                description: "Fewer than three features in active use".to_owned(),
            });
        }
        if patterns.monthly_growth > GROWTH_PROTECTION_THRESHOLD {
            factors.push(ChurnFactor {
                kind: ChurnFactorKind::GrowingUsage,
                impact: FactorImpact::Positive,
                weight: GROWING_USAGE_WEIGHT,
                description: format!(
                    "Usage grew {:.0}% month over month",
                    patterns.monthly_growth * 100.0
                ),
            });
        }

        let score = factors.iter().map(|factor| factor.weight).sum::<f64>().clamp(0.0, 100.0);
        let risk_level = RiskLevel::from_score(score);

        ChurnRiskAssessment {
            risk_level,
            score,
            retention_actions: self.retention_actions(risk_level, &factors),
            factors,
            time_to_churn_days: time_to_churn(risk_level),
            confidence: ASSESSMENT_CONFIDENCE,
        }
    }

    fn retention_actions(
        &self,
        risk_level: RiskLevel,
        factors: &[ChurnFactor],
    ) -> Vec<RetentionAction> {
        let mut actions = Vec::new();
        if risk_level >= RiskLevel::High {
            // Three discounted months at half price.
            let cost = self.pricing.pro_monthly_price * Decimal::new(150, 2);
            actions.push(RetentionAction {
                kind: RetentionActionKind::Discount,
                title: "Offer a 3-month 50% discount".to_owned(),
                description: "Time-boxed price relief for an account showing strong churn signals"
                    .to_owned(),
                priority: Priority::High,
                estimated_impact: 60,
                cost: Some(cost),
            });
        }
        if factors.iter().any(|factor| factor.kind == ChurnFactorKind::LimitedFeatureUsage) {
            actions.push(RetentionAction {
                kind: RetentionActionKind::Education,
                title: "Send a feature walkthrough series".to_owned(),
                description: "Guided tour of the features this account has never opened"
                    .to_owned(),
                priority: Priority::Medium,
                estimated_impact: 40,
                cost: None,
            });
        }
        if factors.iter().any(|factor| factor.kind == ChurnFactorKind::LowEngagement) {
            actions.push(RetentionAction {
                kind: RetentionActionKind::Support,
                title: "Schedule a success check-in".to_owned(),
                description: "Personal outreach to recover a disengaging account".to_owned(),
                priority: Priority::Medium,
                estimated_impact: 35,
                cost: None,
            });
        }
        actions
    }
}

fn time_to_churn(risk_level: RiskLevel) -> Option<u32> {
    match risk_level {
        RiskLevel::Critical => Some(30),
        RiskLevel::High => Some(60),
        RiskLevel::Medium => Some(90),
        RiskLevel::Low => None,
    }
}
