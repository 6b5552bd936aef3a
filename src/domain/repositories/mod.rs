use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{Campaign, CampaignRun, CampaignStatus, GatewaySession};

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn insert(&self, campaign: &Campaign) -> anyhow::Result<()>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Campaign>>;

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Campaign>>;

    /// Moves the campaign from `expected` to `status`. Fails with
    /// `DomainError::WrongStatus` carrying the stored status if it is no
    /// longer `expected`, leaving the record untouched.
    async fn update_status(
        &self,
        id: Uuid,
        expected: CampaignStatus,
        status: CampaignStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<()>;

    /// Replaces status, results and counters with the run's current state.
    /// Fails with `DomainError::NotFound` if the campaign no longer exists.
    async fn save_run(&self, run: &CampaignRun) -> anyhow::Result<()>;

    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Campaign>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn upsert(&self, session: GatewaySession) -> anyhow::Result<GatewaySession>;
    async fn find_by_user(&self, user_id: &Uuid) -> anyhow::Result<Option<GatewaySession>>;
}
