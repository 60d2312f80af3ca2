//! Deterministic demo accounts covering the three report shapes worth
//! demoing: a brand-new free account, a free account pressing its limits,
//! and a paying account that has gone quiet.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use tierwise_core::domain::account::{
    AccountSnapshot, ActivitySummary, ResourceCounters, Tier, UserId,
};
use tierwise_core::domain::usage::{UsageHistory, WeekSample};

use crate::DbPool;

pub const FRESH_FREE_USER: UserId = UserId(Uuid::from_u128(0xA001));
pub const HEAVY_FREE_USER: UserId = UserId(Uuid::from_u128(0xA002));
pub const DORMANT_PRO_USER: UserId = UserId(Uuid::from_u128(0xA003));

pub struct SeedAccount {
    pub label: &'static str,
    pub snapshot: AccountSnapshot,
    pub history: UsageHistory,
    pub activity: ActivitySummary,
}

pub struct SeedSummary {
    pub accounts: Vec<(&'static str, UserId)>,
}

/// The full demo dataset, anchored at `now` so account ages stay stable
/// relative to the run.
pub fn demo_accounts(now: DateTime<Utc>) -> Vec<SeedAccount> {
    vec![fresh_free(now), heavy_free(now), dormant_pro(now)]
}

/// Seeds (or reseeds) the demo dataset into the database.
pub async fn load(pool: &DbPool, now: DateTime<Utc>) -> Result<SeedSummary, sqlx::Error> {
    let accounts = demo_accounts(now);
    let mut tx = pool.begin().await?;

    for account in &accounts {
        let user_id = account.snapshot.user_id.to_string();
        let counters = account.snapshot.counters;
        sqlx::query(
            "INSERT OR REPLACE INTO accounts
                (user_id, tier, created_at, ai_requests, products, marketplace_listings,
                 file_uploads, storage_mb)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&user_id)
        .bind(account.snapshot.tier.as_str())
        .bind(account.snapshot.created_at)
        .bind(counters.ai_requests as i64)
        .bind(counters.products as i64)
        .bind(counters.marketplace_listings as i64)
        .bind(counters.file_uploads as i64)
        .bind(counters.storage_mb as i64)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM usage_weeks WHERE user_id = ?1")
            .bind(&user_id)
            .execute(&mut *tx)
            .await?;
        for week in &account.history.weeks {
            sqlx::query(
                "INSERT INTO usage_weeks
                    (user_id, week_start, ai_requests, products, marketplace_listings,
                     file_uploads, storage_mb, total_activity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(&user_id)
            .bind(week.week_start)
            .bind(week.counters.ai_requests as i64)
            .bind(week.counters.products as i64)
            .bind(week.counters.marketplace_listings as i64)
            .bind(week.counters.file_uploads as i64)
            .bind(week.counters.storage_mb as i64)
            .bind(week.total_activity as i64)
            .execute(&mut *tx)
            .await?;
        }

        let feature_usage = serde_json::to_string(&account.activity.feature_usage)
            .unwrap_or_else(|_| "{}".to_owned());
        let time_of_day = serde_json::to_string(&account.activity.time_of_day_usage.to_vec())
            .unwrap_or_else(|_| "[]".to_owned());
        sqlx::query(
            "INSERT OR REPLACE INTO activity_summaries
                (user_id, login_frequency, feature_usage, time_of_day_usage)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&user_id)
        .bind(account.activity.login_frequency)
        .bind(feature_usage)
        .bind(time_of_day)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(SeedSummary {
        accounts: accounts
            .iter()
            .map(|account| (account.label, account.snapshot.user_id))
            .collect(),
    })
}

fn fresh_free(now: DateTime<Utc>) -> SeedAccount {
    let mut activity = ActivitySummary { login_frequency: 2.0, ..Default::default() };
    activity.feature_usage.insert("editor".to_owned(), 9);
    activity.feature_usage.insert("export".to_owned(), 2);
    activity.time_of_day_usage[10] = 6;
    activity.time_of_day_usage[15] = 5;

    SeedAccount {
        label: "fresh-free",
        snapshot: AccountSnapshot {
            user_id: FRESH_FREE_USER,
            tier: Tier::Free,
            created_at: now - Duration::days(5),
            counters: ResourceCounters { ai_requests: 12, products: 3, ..Default::default() },
        },
        history: weekly_ai_series(now, &[12]),
        activity,
    }
}

fn heavy_free(now: DateTime<Utc>) -> SeedAccount {
    let mut activity = ActivitySummary { login_frequency: 6.0, ..Default::default() };
    activity.feature_usage.insert("editor".to_owned(), 60);
    activity.feature_usage.insert("export".to_owned(), 25);
    activity.feature_usage.insert("api".to_owned(), 18);
    activity.feature_usage.insert("automation".to_owned(), 7);
    activity.time_of_day_usage[9] = 30;
    activity.time_of_day_usage[14] = 35;
    activity.time_of_day_usage[20] = 25;

    let mut account = SeedAccount {
        label: "heavy-free",
        snapshot: AccountSnapshot {
            user_id: HEAVY_FREE_USER,
            tier: Tier::Free,
            created_at: now - Duration::days(90),
            counters: ResourceCounters {
                ai_requests: 85,
                products: 41,
                file_uploads: 52,
                storage_mb: 300,
                ..Default::default()
            },
        },
        history: weekly_ai_series(now, &[30, 40, 50, 55, 65, 70, 80, 85]),
        activity,
    };
    for week in &mut account.history.weeks {
        week.counters.products = 40;
        week.total_activity += 80;
    }
    account
}

fn dormant_pro(now: DateTime<Utc>) -> SeedAccount {
    let mut activity = ActivitySummary { login_frequency: 0.4, ..Default::default() };
    activity.feature_usage.insert("editor".to_owned(), 2);
    activity.time_of_day_usage[22] = 3;

    SeedAccount {
        label: "dormant-pro",
        snapshot: AccountSnapshot {
            user_id: DORMANT_PRO_USER,
            tier: Tier::Pro,
            created_at: now - Duration::days(400),
            counters: ResourceCounters { ai_requests: 3, products: 6, ..Default::default() },
        },
        history: weekly_ai_series(now, &[40, 35, 30, 22, 15, 10, 6, 3]),
        activity,
    }
}

fn weekly_ai_series(now: DateTime<Utc>, values: &[u64]) -> UsageHistory {
    let weeks = values.len() as i64;
    UsageHistory {
        weeks: values
            .iter()
            .enumerate()
            .map(|(index, value)| WeekSample {
                week_start: (now - Duration::weeks(weeks - index as i64)).date_naive(),
                counters: ResourceCounters { ai_requests: *value, ..Default::default() },
                total_activity: value * 2,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use crate::{connect_with_settings, migrations};

    use super::*;

    #[test]
    fn demo_ids_are_stable_across_runs() {
        let now = Utc::now();
        let first: Vec<_> =
            demo_accounts(now).iter().map(|account| account.snapshot.user_id).collect();
        let second: Vec<_> =
            demo_accounts(now).iter().map(|account| account.snapshot.user_id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![FRESH_FREE_USER, HEAVY_FREE_USER, DORMANT_PRO_USER]);
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        let now = Utc::now();
        load(&pool, now).await.expect("first seed");
        let summary = load(&pool, now).await.expect("reseed");
        assert_eq!(summary.accounts.len(), 3);

        let account_count = sqlx::query("SELECT COUNT(*) AS count FROM accounts")
            .fetch_one(&pool)
            .await
            .expect("count accounts")
            .get::<i64, _>("count");
        assert_eq!(account_count, 3);

        let week_count = sqlx::query("SELECT COUNT(*) AS count FROM usage_weeks")
            .fetch_one(&pool)
            .await
            .expect("count weeks")
            .get::<i64, _>("count");
        // 1 + 8 + 8 weeks, not doubled by the second seed.
        assert_eq!(week_count, 17);
    }
}
