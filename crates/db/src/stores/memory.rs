//! In-memory store for tests and the seeded demo path.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tierwise_core::domain::account::{AccountSnapshot, ActivitySummary, UserId};
use tierwise_core::domain::usage::UsageHistory;
use tierwise_core::errors::StoreError;
use tierwise_core::store::IntelligenceStore;

#[derive(Clone, Debug, Default)]
pub struct AccountRecord {
    pub snapshot: Option<AccountSnapshot>,
    pub history: UsageHistory,
    pub activity: ActivitySummary,
}

#[derive(Default)]
pub struct InMemoryIntelligenceStore {
    accounts: RwLock<HashMap<UserId, AccountRecord>>,
}

impl InMemoryIntelligenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn upsert(
        &self,
        snapshot: AccountSnapshot,
        history: UsageHistory,
        activity: ActivitySummary,
    ) {
        let user_id = snapshot.user_id;
        let record = AccountRecord { snapshot: Some(snapshot), history, activity };
        self.accounts.write().await.insert(user_id, record);
    }

    pub async fn remove(&self, user_id: &UserId) {
        self.accounts.write().await.remove(user_id);
    }
}

#[async_trait]
impl IntelligenceStore for InMemoryIntelligenceStore {
    async fn load_snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(user_id)
            .and_then(|record| record.snapshot.clone()))
    }

    async fn load_usage_history(&self, user_id: &UserId) -> Result<UsageHistory, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(user_id)
            .map(|record| record.history.clone())
            .unwrap_or_default())
    }

    async fn load_activity(&self, user_id: &UserId) -> Result<ActivitySummary, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(user_id)
            .map(|record| record.activity.clone())
            .unwrap_or_default())
    }
}
