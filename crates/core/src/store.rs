use async_trait::async_trait;

use crate::domain::account::{AccountSnapshot, ActivitySummary, UserId};
use crate::domain::usage::UsageHistory;
use crate::errors::StoreError;

/// Data-access collaborator injected into the orchestrator. Implementations
/// own all I/O and its time bounds; the engine reads each input exactly
/// once per request and treats the result as an immutable snapshot.
#[async_trait]
pub trait IntelligenceStore: Send + Sync {
    /// Current tier, creation timestamp, and live counters for one account.
    async fn load_snapshot(&self, user_id: &UserId)
        -> Result<Option<AccountSnapshot>, StoreError>;

    /// Ordered weekly usage series, oldest first. May be shorter than the
    /// typical 8 weeks; missing weeks are treated as zero-filled downstream.
    async fn load_usage_history(&self, user_id: &UserId) -> Result<UsageHistory, StoreError>;

    /// Login, feature, and time-of-day aggregates.
    async fn load_activity(&self, user_id: &UserId) -> Result<ActivitySummary, StoreError>;
}
