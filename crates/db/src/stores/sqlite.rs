//! Sqlite-backed store. Counters and weekly series live in plain columns;
//! the two irregular activity shapes (feature map, hour histogram) are
//! stored as JSON text.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use tierwise_core::domain::account::{
    AccountSnapshot, ActivitySummary, ResourceCounters, Tier, UserId,
};
use tierwise_core::domain::usage::{UsageHistory, WeekSample};
use tierwise_core::errors::StoreError;
use tierwise_core::store::IntelligenceStore;

use crate::DbPool;

pub struct SqliteIntelligenceStore {
    pool: DbPool,
}

impl SqliteIntelligenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IntelligenceStore for SqliteIntelligenceStore {
    async fn load_snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        let row = sqlx::query(
            "SELECT tier, created_at, ai_requests, products, marketplace_listings,
                    file_uploads, storage_mb
             FROM accounts WHERE user_id = ?1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        row.map(|row| snapshot_from_row(*user_id, &row)).transpose()
    }

    async fn load_usage_history(&self, user_id: &UserId) -> Result<UsageHistory, StoreError> {
        let rows = sqlx::query(
            "SELECT week_start, ai_requests, products, marketplace_listings,
                    file_uploads, storage_mb, total_activity
             FROM usage_weeks WHERE user_id = ?1
             ORDER BY week_start ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        let weeks = rows.iter().map(week_from_row).collect::<Result<Vec<_>, _>>()?;
        Ok(UsageHistory { weeks })
    }

    async fn load_activity(&self, user_id: &UserId) -> Result<ActivitySummary, StoreError> {
        let row = sqlx::query(
            "SELECT login_frequency, feature_usage, time_of_day_usage
             FROM activity_summaries WHERE user_id = ?1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        // An account with no activity record analyzes as fully inactive.
        row.map(|row| activity_from_row(&row)).transpose().map(Option::unwrap_or_default)
    }
}

fn snapshot_from_row(user_id: UserId, row: &SqliteRow) -> Result<AccountSnapshot, StoreError> {
    let tier_text: String = row.try_get("tier").map_err(decode)?;
    let tier = match tier_text.as_str() {
        "free" => Tier::Free,
        "pro" => Tier::Pro,
        other => return Err(StoreError::Decode(format!("unknown tier `{other}`"))),
    };
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    Ok(AccountSnapshot { user_id, tier, created_at, counters: counters_from_row(row)? })
}

fn week_from_row(row: &SqliteRow) -> Result<WeekSample, StoreError> {
    let week_start: NaiveDate = row.try_get("week_start").map_err(decode)?;
    let total_activity = counter(row, "total_activity")?;
    Ok(WeekSample { week_start, counters: counters_from_row(row)?, total_activity })
}

fn activity_from_row(row: &SqliteRow) -> Result<ActivitySummary, StoreError> {
    let login_frequency: f64 = row.try_get("login_frequency").map_err(decode)?;

    let feature_json: String = row.try_get("feature_usage").map_err(decode)?;
    let feature_usage: HashMap<String, u64> = serde_json::from_str(&feature_json)
        .map_err(|err| StoreError::Decode(format!("feature_usage: {err}")))?;

    let hours_json: String = row.try_get("time_of_day_usage").map_err(decode)?;
    let hours: Vec<u64> = serde_json::from_str(&hours_json)
        .map_err(|err| StoreError::Decode(format!("time_of_day_usage: {err}")))?;
    let mut time_of_day_usage = [0u64; 24];
    for (slot, value) in time_of_day_usage.iter_mut().zip(hours) {
        *slot = value;
    }

    Ok(ActivitySummary { login_frequency, feature_usage, time_of_day_usage })
}

fn counters_from_row(row: &SqliteRow) -> Result<ResourceCounters, StoreError> {
    Ok(ResourceCounters {
        ai_requests: counter(row, "ai_requests")?,
        products: counter(row, "products")?,
        marketplace_listings: counter(row, "marketplace_listings")?,
        file_uploads: counter(row, "file_uploads")?,
        storage_mb: counter(row, "storage_mb")?,
    })
}

fn counter(row: &SqliteRow, column: &str) -> Result<u64, StoreError> {
    let value: i64 = row.try_get(column).map_err(decode)?;
    u64::try_from(value)
        .map_err(|_| StoreError::Decode(format!("negative counter in column `{column}`")))
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn decode(err: sqlx::Error) -> StoreError {
    StoreError::Decode(err.to_string())
}
