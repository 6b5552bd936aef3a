use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Campaign, CampaignRun, CampaignStatus, GatewaySession},
    repositories::{CampaignRepository, SessionRepository},
};

#[derive(Default)]
pub struct InMemoryCampaignRepository {
    campaigns: Arc<RwLock<HashMap<Uuid, Campaign>>>,
}

impl InMemoryCampaignRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn insert(&self, campaign: &Campaign) -> anyhow::Result<()> {
        let mut campaigns = self.campaigns.write().await;
        if campaigns.contains_key(&campaign.id) {
            return Err(DomainError::AlreadyExists(format!("campaign {}", campaign.id)).into());
        }
        campaigns.insert(campaign.id, campaign.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Campaign>> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Campaign>> {
        let campaigns = self.campaigns.read().await;
        let mut owned: Vec<_> = campaigns
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: CampaignStatus,
        status: CampaignStatus,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> anyhow::Result<()> {
        let mut campaigns = self.campaigns.write().await;
        let campaign = campaigns
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("campaign {id}")))?;
        if campaign.status != expected {
            return Err(DomainError::WrongStatus(campaign.status).into());
        }
        campaign.status = status;
        campaign.scheduled_at = scheduled_at.or(campaign.scheduled_at);
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn save_run(&self, run: &CampaignRun) -> anyhow::Result<()> {
        let mut campaigns = self.campaigns.write().await;
        let campaign = campaigns
            .get_mut(&run.campaign_id())
            .ok_or_else(|| DomainError::NotFound(format!("campaign {}", run.campaign_id())))?;
        campaign.status = run.status();
        campaign.results = run.ledger().to_vec();
        campaign.total_recipients = run.total_recipients();
        campaign.success_count = run.success_count();
        campaign.failure_count = run.failure_count();
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Campaign>> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns
            .values()
            .filter(|c| {
                c.status == CampaignStatus::Scheduled && c.scheduled_at.is_some_and(|at| at <= now)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, GatewaySession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn upsert(&self, session: GatewaySession) -> anyhow::Result<GatewaySession> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.user_id, session.clone());
        Ok(session)
    }

    async fn find_by_user(&self, user_id: &Uuid) -> anyhow::Result<Option<GatewaySession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Recipient;

    fn campaign(user_id: Uuid) -> Campaign {
        Campaign::draft(
            user_id,
            "launch".to_string(),
            "hello".to_string(),
            vec![Recipient::new("111@c.us", false)],
            0,
        )
    }

    #[tokio::test]
    async fn lists_only_own_campaigns_newest_first() {
        let repo = InMemoryCampaignRepository::new();
        let user_id = Uuid::new_v4();
        let mut older = campaign(user_id);
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = campaign(user_id);
        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();
        repo.insert(&campaign(Uuid::new_v4())).await.unwrap();

        let ids: Vec<_> = repo
            .list_by_user(user_id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();

        assert_eq!(ids, [newer.id, older.id]);
    }

    #[tokio::test]
    async fn status_update_requires_the_expected_status() {
        let repo = InMemoryCampaignRepository::new();
        let mut running = campaign(Uuid::new_v4());
        running.status = CampaignStatus::Running;
        repo.insert(&running).await.unwrap();

        let err = repo
            .update_status(
                running.id,
                CampaignStatus::Draft,
                CampaignStatus::Scheduled,
                Some(Utc::now()),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::WrongStatus(CampaignStatus::Running))
        ));
        let stored = repo.get(running.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CampaignStatus::Running);
        assert_eq!(stored.scheduled_at, None);
    }

    #[tokio::test]
    async fn session_upsert_replaces_previous() {
        let repo = InMemorySessionRepository::new();
        let user_id = Uuid::new_v4();
        for name in ["first", "second"] {
            repo.upsert(GatewaySession {
                user_id,
                session_name: name.to_string(),
                token: "t".to_string(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        let session = repo.find_by_user(&user_id).await.unwrap().unwrap();
        assert_eq!(session.session_name, "second");
    }
}
