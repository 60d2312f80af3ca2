use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Subscription level governing resource limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Free,
    Pro,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
        }
    }
}

/// The five metered resources the engine reasons about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    AiRequests,
    Products,
    MarketplaceListings,
    FileUploads,
    StorageMb,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::AiRequests,
        ResourceKind::Products,
        ResourceKind::MarketplaceListings,
        ResourceKind::FileUploads,
        ResourceKind::StorageMb,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::AiRequests => "AI requests",
            ResourceKind::Products => "products",
            ResourceKind::MarketplaceListings => "marketplace listings",
            ResourceKind::FileUploads => "file uploads",
            ResourceKind::StorageMb => "storage (MB)",
        }
    }
}

/// Current-period counters for the five metered resources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounters {
    pub ai_requests: u64,
    pub products: u64,
    pub marketplace_listings: u64,
    pub file_uploads: u64,
    pub storage_mb: u64,
}

impl ResourceCounters {
    pub fn get(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::AiRequests => self.ai_requests,
            ResourceKind::Products => self.products,
            ResourceKind::MarketplaceListings => self.marketplace_listings,
            ResourceKind::FileUploads => self.file_uploads,
            ResourceKind::StorageMb => self.storage_mb,
        }
    }

    pub fn total(&self) -> u64 {
        ResourceKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }
}

/// A per-resource cap. `Unlimited` replaces the `-1` sentinel used by
/// legacy billing payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaLimit {
    Unlimited,
    Capped(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierLimits {
    pub ai_requests: QuotaLimit,
    pub products: QuotaLimit,
    pub marketplace_listings: QuotaLimit,
    pub file_uploads: QuotaLimit,
    pub storage_mb: QuotaLimit,
}

impl TierLimits {
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Free => Self {
                ai_requests: QuotaLimit::Capped(100),
                products: QuotaLimit::Capped(50),
                marketplace_listings: QuotaLimit::Capped(10),
                file_uploads: QuotaLimit::Capped(100),
                storage_mb: QuotaLimit::Capped(512),
            },
            Tier::Pro => Self {
                ai_requests: QuotaLimit::Unlimited,
                products: QuotaLimit::Unlimited,
                marketplace_listings: QuotaLimit::Capped(100),
                file_uploads: QuotaLimit::Unlimited,
                storage_mb: QuotaLimit::Capped(10_240),
            },
        }
    }

    pub fn get(&self, kind: ResourceKind) -> QuotaLimit {
        match kind {
            ResourceKind::AiRequests => self.ai_requests,
            ResourceKind::Products => self.products,
            ResourceKind::MarketplaceListings => self.marketplace_listings,
            ResourceKind::FileUploads => self.file_uploads,
            ResourceKind::StorageMb => self.storage_mb,
        }
    }
}

/// Point-in-time view of one account, read once per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub user_id: UserId,
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub counters: ResourceCounters,
}

impl AccountSnapshot {
    pub fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days()
    }

    pub fn limits(&self) -> TierLimits {
        TierLimits::for_tier(self.tier)
    }
}

/// Login, feature, and time-of-day activity aggregates for one account.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Logins per week, 0..=7.
    pub login_frequency: f64,
    /// Feature name to invocation count. Keys are not a fixed set.
    pub feature_usage: HashMap<String, u64>,
    /// Activity count per hour of day.
    pub time_of_day_usage: [u64; 24],
}

impl ActivitySummary {
    pub fn distinct_active_features(&self) -> usize {
        self.feature_usage.values().filter(|count| **count > 0).count()
    }

    /// Hour with the most activity, together with its share of the total.
    pub fn peak_hour(&self) -> Option<(usize, f64)> {
        let total: u64 = self.time_of_day_usage.iter().sum();
        if total == 0 {
            return None;
        }
        self.time_of_day_usage
            .iter()
            .enumerate()
            .max_by_key(|(_, count)| **count)
            .map(|(hour, count)| (hour, *count as f64 / total as f64))
    }
}
