use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::account::{QuotaLimit, ResourceCounters, ResourceKind};

/// Direction of a resource's recent usage curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// One resource's current/limit/trend/projection bundle. Derived on every
/// request, never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsageMetric {
    pub current: u64,
    pub limit: QuotaLimit,
    /// `round(100 * current / limit)`; 0 for unlimited quotas. Deliberately
    /// not clamped above 100 so callers can detect over-limit accounts.
    pub percentage: u32,
    pub trend: TrendDirection,
    pub weekly_average: f64,
    pub monthly_average: f64,
    pub peak_usage: u64,
    pub projected_monthly: f64,
}

impl UsageMetric {
    pub fn is_over_limit(&self) -> bool {
        self.percentage > 100
    }
}

/// One week of historical usage, oldest-to-newest in `UsageHistory`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSample {
    pub week_start: NaiveDate,
    pub counters: ResourceCounters,
    pub total_activity: u64,
}

/// Ordered weekly series for one account, typically 8 entries. Shorter
/// series still analyze; the window slices shrink gracefully.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageHistory {
    pub weeks: Vec<WeekSample>,
}

impl UsageHistory {
    pub fn series_for(&self, kind: ResourceKind) -> Vec<u64> {
        self.weeks.iter().map(|week| week.counters.get(kind)).collect()
    }

    pub fn weekly_totals(&self) -> Vec<u64> {
        self.weeks.iter().map(|week| week.counters.total()).collect()
    }
}

/// Aggregated week entry surfaced in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    pub week_start: NaiveDate,
    pub usage: u64,
    pub total_activity: u64,
}

/// Full per-account usage picture: five metrics plus engagement aggregates.
/// Built fresh per analysis call and immutable once returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsagePatterns {
    pub metrics: BTreeMap<ResourceKind, UsageMetric>,
    pub login_frequency: f64,
    pub feature_usage: HashMap<String, u64>,
    pub time_of_day_usage: [u64; 24],
    pub weekly_trends: Vec<WeeklyTrend>,
    /// Signed growth ratio across the series, 0 when there is no baseline.
    pub monthly_growth: f64,
}

impl UsagePatterns {
    pub fn metric(&self, kind: ResourceKind) -> &UsageMetric {
        &self.metrics[&kind]
    }

    /// Share of the five metrics whose trend is decreasing.
    pub fn declining_fraction(&self) -> f64 {
        let declining = self
            .metrics
            .values()
            .filter(|metric| metric.trend == TrendDirection::Decreasing)
            .count();
        declining as f64 / ResourceKind::ALL.len() as f64
    }

    /// Total current usage across the five resources, the classifier's
    /// high-usage signal.
    pub fn usage_signal(&self) -> u64 {
        self.metrics.values().map(|metric| metric.current).sum()
    }

    pub fn distinct_active_features(&self) -> usize {
        self.feature_usage.values().filter(|count| **count > 0).count()
    }
}
