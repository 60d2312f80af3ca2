//! Usage pattern analysis: converts raw counters and the weekly history
//! series into per-resource metrics, trends, and projections.

use std::collections::BTreeMap;

use crate::config::AnalyzerConfig;
use crate::domain::account::{AccountSnapshot, ActivitySummary, QuotaLimit, ResourceKind};
use crate::domain::usage::{TrendDirection, UsageHistory, UsageMetric, UsagePatterns, WeeklyTrend};

/// Number of trailing weeks feeding the weekly average and the growth
/// windows.
const TREND_WINDOW_WEEKS: usize = 4;
/// Points compared at each end of the series for trend classification.
const TREND_EDGE_POINTS: usize = 2;

#[derive(Clone, Debug)]
pub struct UsagePatternAnalyzer {
    config: AnalyzerConfig,
}

impl UsagePatternAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Builds the full usage picture for one account. Pure: the same
    /// snapshot, history, and activity always produce the same patterns.
    pub fn analyze(
        &self,
        snapshot: &AccountSnapshot,
        history: &UsageHistory,
        activity: &ActivitySummary,
    ) -> UsagePatterns {
        let limits = snapshot.limits();
        let mut metrics = BTreeMap::new();
        for kind in ResourceKind::ALL {
            let series = history.series_for(kind);
            let metric = self.metric(snapshot.counters.get(kind), limits.get(kind), &series);
            metrics.insert(kind, metric);
        }

        let weekly_trends = history
            .weeks
            .iter()
            .map(|week| WeeklyTrend {
                week_start: week.week_start,
                usage: week.counters.total(),
                total_activity: week.total_activity,
            })
            .collect();

        UsagePatterns {
            metrics,
            login_frequency: activity.login_frequency.clamp(0.0, 7.0),
            feature_usage: activity.feature_usage.clone(),
            time_of_day_usage: activity.time_of_day_usage,
            weekly_trends,
            monthly_growth: monthly_growth(&history.weekly_totals()),
        }
    }

    fn metric(&self, current: u64, limit: QuotaLimit, series: &[u64]) -> UsageMetric {
        let trend = self.classify_trend(series);
        let projected_monthly = match trend {
            TrendDirection::Increasing => current as f64 * self.config.growth_projection,
            TrendDirection::Decreasing => current as f64 * self.config.decline_projection,
            TrendDirection::Stable => current as f64,
        };

        let tail_start = series.len().saturating_sub(TREND_WINDOW_WEEKS);
        UsageMetric {
            current,
            limit,
            percentage: usage_percentage(current, limit),
            trend,
            weekly_average: mean(&series[tail_start..]),
            monthly_average: mean(series),
            peak_usage: series.iter().copied().max().unwrap_or(0).max(current),
            projected_monthly,
        }
    }

    /// Compares the mean of the newest points against the mean of the
    /// oldest. Windows shrink for short series instead of failing.
    fn classify_trend(&self, series: &[u64]) -> TrendDirection {
        if series.is_empty() {
            return TrendDirection::Stable;
        }
        let window = series.len().min(TREND_EDGE_POINTS);
        let older = mean(&series[..window]);
        let recent = mean(&series[series.len() - window..]);

        if recent > older * self.config.trend_up_ratio {
            TrendDirection::Increasing
        } else if recent < older * self.config.trend_down_ratio {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

/// `round(100 * current / limit)`; unlimited and zero-capped quotas both
/// report 0 rather than dividing.
fn usage_percentage(current: u64, limit: QuotaLimit) -> u32 {
    match limit {
        QuotaLimit::Unlimited | QuotaLimit::Capped(0) => 0,
        QuotaLimit::Capped(cap) => (100.0 * current as f64 / cap as f64).round() as u32,
    }
}

fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<u64>() as f64 / values.len() as f64
}

/// Account-wide growth: newest four-week total versus oldest four-week
/// total, 0 when the older window carried no usage.
fn monthly_growth(weekly_totals: &[u64]) -> f64 {
    let window = weekly_totals.len().min(TREND_WINDOW_WEEKS);
    if window == 0 {
        return 0.0;
    }
    let oldest: u64 = weekly_totals[..window].iter().sum();
    let newest: u64 = weekly_totals[weekly_totals.len() - window..].iter().sum();
    if oldest == 0 {
        return 0.0;
    }
    (newest as f64 - oldest as f64) / oldest as f64
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::account::{ResourceCounters, Tier, UserId};
    use crate::domain::usage::WeekSample;

    use super::*;

    fn analyzer() -> UsagePatternAnalyzer {
        UsagePatternAnalyzer::new(AnalyzerConfig::default())
    }

    fn history_of(ai_series: &[u64]) -> UsageHistory {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        UsageHistory {
            weeks: ai_series
                .iter()
                .enumerate()
                .map(|(index, value)| WeekSample {
                    week_start: start + chrono::Duration::weeks(index as i64),
                    counters: ResourceCounters { ai_requests: *value, ..Default::default() },
                    total_activity: *value,
                })
                .collect(),
        }
    }

    fn snapshot_with_ai(current: u64, tier: Tier) -> AccountSnapshot {
        AccountSnapshot {
            user_id: UserId(uuid::Uuid::from_u128(1)),
            tier,
            created_at: chrono::Utc::now(),
            counters: ResourceCounters { ai_requests: current, ..Default::default() },
        }
    }

    #[test]
    fn unlimited_quota_always_reports_zero_percentage() {
        for current in [0, 10, 1_000_000] {
            assert_eq!(usage_percentage(current, QuotaLimit::Unlimited), 0);
        }
    }

    #[test]
    fn percentage_is_rounded_and_not_capped_at_100() {
        assert_eq!(usage_percentage(85, QuotaLimit::Capped(100)), 85);
        assert_eq!(usage_percentage(1, QuotaLimit::Capped(3)), 33);
        assert_eq!(usage_percentage(150, QuotaLimit::Capped(100)), 150);
    }

    #[test]
    fn zero_capped_quota_does_not_divide() {
        assert_eq!(usage_percentage(50, QuotaLimit::Capped(0)), 0);
    }

    #[test]
    fn monotonic_growth_classifies_as_increasing() {
        let patterns = analyzer().analyze(
            &snapshot_with_ai(90, Tier::Free),
            &history_of(&[10, 20, 40, 80]),
            &ActivitySummary::default(),
        );
        let metric = patterns.metric(ResourceKind::AiRequests);
        assert_eq!(metric.trend, TrendDirection::Increasing);
        assert!((metric.projected_monthly - 90.0 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn collapsing_usage_classifies_as_decreasing() {
        let patterns = analyzer().analyze(
            &snapshot_with_ai(5, Tier::Free),
            &history_of(&[80, 70, 20, 10]),
            &ActivitySummary::default(),
        );
        let metric = patterns.metric(ResourceKind::AiRequests);
        assert_eq!(metric.trend, TrendDirection::Decreasing);
        assert!((metric.projected_monthly - 5.0 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn flat_series_is_stable_and_projects_current() {
        let patterns = analyzer().analyze(
            &snapshot_with_ai(50, Tier::Free),
            &history_of(&[50, 50, 50, 50]),
            &ActivitySummary::default(),
        );
        let metric = patterns.metric(ResourceKind::AiRequests);
        assert_eq!(metric.trend, TrendDirection::Stable);
        assert!((metric.projected_monthly - 50.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_history_still_computes() {
        let patterns = analyzer().analyze(
            &snapshot_with_ai(10, Tier::Free),
            &history_of(&[7]),
            &ActivitySummary::default(),
        );
        let metric = patterns.metric(ResourceKind::AiRequests);
        assert_eq!(metric.trend, TrendDirection::Stable);
        assert!((metric.weekly_average - 7.0).abs() < 1e-9);
        assert_eq!(metric.peak_usage, 10);
    }

    #[test]
    fn empty_history_degrades_to_neutral_values() {
        let patterns = analyzer().analyze(
            &snapshot_with_ai(10, Tier::Free),
            &UsageHistory::default(),
            &ActivitySummary::default(),
        );
        let metric = patterns.metric(ResourceKind::AiRequests);
        assert_eq!(metric.trend, TrendDirection::Stable);
        assert_eq!(metric.weekly_average, 0.0);
        assert_eq!(metric.monthly_average, 0.0);
        assert_eq!(metric.peak_usage, 10);
        assert_eq!(patterns.monthly_growth, 0.0);
    }

    #[test]
    fn weekly_average_uses_only_the_last_four_weeks() {
        let patterns = analyzer().analyze(
            &snapshot_with_ai(0, Tier::Free),
            &history_of(&[1000, 1000, 1000, 1000, 10, 10, 10, 10]),
            &ActivitySummary::default(),
        );
        let metric = patterns.metric(ResourceKind::AiRequests);
        assert!((metric.weekly_average - 10.0).abs() < 1e-9);
        assert!((metric.monthly_average - 505.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_growth_compares_four_week_windows() {
        assert!((monthly_growth(&[10, 10, 10, 10, 20, 20, 20, 20]) - 1.0).abs() < 1e-9);
        assert_eq!(monthly_growth(&[0, 0, 0, 0, 20, 20, 20, 20]), 0.0);
        assert_eq!(monthly_growth(&[]), 0.0);
    }

    #[test]
    fn pro_unlimited_resources_report_zero_percentage_end_to_end() {
        let patterns = analyzer().analyze(
            &snapshot_with_ai(5_000, Tier::Pro),
            &history_of(&[100, 100, 100, 100]),
            &ActivitySummary::default(),
        );
        assert_eq!(patterns.metric(ResourceKind::AiRequests).percentage, 0);
    }
}
