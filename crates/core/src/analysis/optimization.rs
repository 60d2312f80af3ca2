//! Self-service optimization tips derived from the usage picture alone.

use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::domain::account::{AccountSnapshot, ResourceKind, Tier};
use crate::domain::optimization::{Difficulty, OptimizationSuggestion, SuggestionKind};
use crate::domain::usage::UsagePatterns;

const NEAR_LIMIT_PERCENTAGE: u32 = 80;
const LIGHT_USAGE_PERCENTAGE: u32 = 30;
const DOMINANT_HOUR_SHARE: f64 = 0.5;
const NARROW_FEATURE_COUNT: usize = 3;

#[derive(Clone, Debug)]
pub struct OptimizationAdvisor {
    pricing: PricingConfig,
}

impl OptimizationAdvisor {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    pub fn evaluate(
        &self,
        snapshot: &AccountSnapshot,
        patterns: &UsagePatterns,
    ) -> Vec<OptimizationSuggestion> {
        let mut suggestions = Vec::new();
        suggestions.extend(self.near_limit_tips(patterns));
        if let Some(suggestion) = self.annual_billing_tip(snapshot, patterns) {
            suggestions.push(suggestion);
        }
        if let Some(suggestion) = batching_tip(patterns) {
            suggestions.push(suggestion);
        }
        if let Some(suggestion) = feature_breadth_tip(patterns) {
            suggestions.push(suggestion);
        }
        suggestions
    }

    /// One tip per capped resource running over 80% of its quota.
    fn near_limit_tips(&self, patterns: &UsagePatterns) -> Vec<OptimizationSuggestion> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| patterns.metric(*kind).percentage > NEAR_LIMIT_PERCENTAGE)
            .map(|kind| OptimizationSuggestion {
                kind: SuggestionKind::Usage,
                title: format!("Trim {} consumption", kind.label()),
                description: format!(
                    "{} are at {}% of the current quota; pruning unused entries avoids hitting \
                     the cap mid-cycle",
                    kind.label(),
                    patterns.metric(kind).percentage
                ),
                impact: "Avoids over-limit interruptions".to_owned(),
                potential_savings: None,
                potential_value: None,
                difficulty: Difficulty::Easy,
                estimated_time: Some("15 minutes".to_owned()),
                steps: vec![
                    format!("Review existing {}", kind.label()),
                    "Archive or delete entries you no longer need".to_owned(),
                    "Re-check the usage meter afterwards".to_owned(),
                ],
            })
            .collect()
    }

    fn annual_billing_tip(
        &self,
        snapshot: &AccountSnapshot,
        patterns: &UsagePatterns,
    ) -> Option<OptimizationSuggestion> {
        if snapshot.tier != Tier::Pro {
            return None;
        }
        let light = patterns
            .metrics
            .values()
            .all(|metric| metric.percentage < LIGHT_USAGE_PERCENTAGE);
        if !light {
            return None;
        }
        let savings =
            self.pricing.pro_monthly_price * Decimal::from(12) - self.pricing.pro_yearly_price;
        Some(OptimizationSuggestion {
            kind: SuggestionKind::Billing,
            title: "Switch to yearly billing".to_owned(),
            description: "Usage sits comfortably inside the plan; yearly billing keeps the same \
                          headroom at a lower effective rate"
                .to_owned(),
            impact: "Lower effective monthly price".to_owned(),
            potential_savings: Some(savings.round_dp(2)),
            potential_value: None,
            difficulty: Difficulty::Easy,
            estimated_time: Some("5 minutes".to_owned()),
            steps: vec![
                "Open billing settings".to_owned(),
                "Select the yearly interval".to_owned(),
            ],
        })
    }
}

fn batching_tip(patterns: &UsagePatterns) -> Option<OptimizationSuggestion> {
    let total: u64 = patterns.time_of_day_usage.iter().sum();
    if total == 0 {
        return None;
    }
    let (hour, count) = patterns
        .time_of_day_usage
        .iter()
        .enumerate()
        .max_by_key(|(_, count)| **count)?;
    let share = *count as f64 / total as f64;
    if share <= DOMINANT_HOUR_SHARE {
        return None;
    }
    Some(OptimizationSuggestion {
        kind: SuggestionKind::Workflow,
        title: "Batch work outside your peak hour".to_owned(),
        description: format!(
            "{:.0}% of activity lands in the {hour}:00 hour; spreading bulk operations out \
             smooths rate limits and queue times",
            share * 100.0
        ),
        impact: "Fewer throttled requests".to_owned(),
        potential_savings: None,
        potential_value: None,
        difficulty: Difficulty::Medium,
        estimated_time: None,
        steps: Vec::new(),
    })
}

fn feature_breadth_tip(patterns: &UsagePatterns) -> Option<OptimizationSuggestion> {
    if patterns.distinct_active_features() >= NARROW_FEATURE_COUNT {
        return None;
    }
    Some(OptimizationSuggestion {
        kind: SuggestionKind::Features,
        title: "Explore more of the toolkit".to_owned(),
        description: "Most of the plan's features are unused; several directly automate manual \
                      steps in common workflows"
            .to_owned(),
        impact: "More value from the current plan".to_owned(),
        potential_savings: None,
        potential_value: None,
        difficulty: Difficulty::Easy,
        estimated_time: Some("30 minutes".to_owned()),
        steps: vec![
            "Open the feature tour from the help menu".to_owned(),
            "Enable one new feature in a test project".to_owned(),
        ],
    })
}
