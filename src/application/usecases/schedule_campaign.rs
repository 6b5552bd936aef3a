use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Campaign, CampaignStatus},
    repositories::CampaignRepository,
};

use super::load_owned;

pub struct ScheduleCampaignUseCase {
    repo: Arc<dyn CampaignRepository>,
}

pub struct ScheduleCampaignRequest {
    pub user_id: Uuid,
    pub campaign_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
}

impl ScheduleCampaignUseCase {
    pub fn new(repo: Arc<dyn CampaignRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, request: ScheduleCampaignRequest) -> anyhow::Result<Campaign> {
        let mut campaign =
            load_owned(self.repo.as_ref(), request.campaign_id, request.user_id).await?;

        if !campaign.status.can_transition_to(CampaignStatus::Scheduled) {
            return Err(DomainError::WrongStatus(campaign.status).into());
        }

        self.repo
            .update_status(
                campaign.id,
                campaign.status,
                CampaignStatus::Scheduled,
                Some(request.scheduled_at),
            )
            .await?;

        campaign.status = CampaignStatus::Scheduled;
        campaign.scheduled_at = Some(request.scheduled_at);
        Ok(campaign)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::models::{CampaignRun, Recipient},
        infrastructure::repositories::in_memory::InMemoryCampaignRepository,
    };

    fn draft(user_id: Uuid) -> Campaign {
        Campaign::draft(
            user_id,
            "launch".to_string(),
            "hello".to_string(),
            vec![Recipient::new("111@c.us", false)],
            0,
        )
    }

    /// Serves every read as the campaign looked while still a draft, as if a
    /// run had started right after the read.
    struct StaleReads {
        inner: InMemoryCampaignRepository,
    }

    #[async_trait]
    impl CampaignRepository for StaleReads {
        async fn insert(&self, campaign: &Campaign) -> anyhow::Result<()> {
            self.inner.insert(campaign).await
        }

        async fn get(&self, id: Uuid) -> anyhow::Result<Option<Campaign>> {
            Ok(self.inner.get(id).await?.map(|mut campaign| {
                campaign.status = CampaignStatus::Draft;
                campaign
            }))
        }

        async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Campaign>> {
            self.inner.list_by_user(user_id).await
        }

        async fn update_status(
            &self,
            id: Uuid,
            expected: CampaignStatus,
            status: CampaignStatus,
            scheduled_at: Option<DateTime<Utc>>,
        ) -> anyhow::Result<()> {
            self.inner
                .update_status(id, expected, status, scheduled_at)
                .await
        }

        async fn save_run(&self, run: &CampaignRun) -> anyhow::Result<()> {
            self.inner.save_run(run).await
        }

        async fn list_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Campaign>> {
            self.inner.list_due(now).await
        }
    }

    #[tokio::test]
    async fn never_moves_a_started_run_back_to_scheduled() {
        let user_id = Uuid::new_v4();
        let mut campaign = draft(user_id);
        campaign.status = CampaignStatus::Running;
        let repo = Arc::new(StaleReads {
            inner: InMemoryCampaignRepository::new(),
        });
        repo.insert(&campaign).await.unwrap();

        let err = ScheduleCampaignUseCase::new(repo.clone())
            .execute(ScheduleCampaignRequest {
                user_id,
                campaign_id: campaign.id,
                scheduled_at: Utc::now(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::WrongStatus(CampaignStatus::Running))
        ));
        let stored = repo.inner.get(campaign.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CampaignStatus::Running);
    }

    #[tokio::test]
    async fn schedules_a_draft_once() {
        let repo = Arc::new(InMemoryCampaignRepository::new());
        let user_id = Uuid::new_v4();
        let campaign = draft(user_id);
        repo.insert(&campaign).await.unwrap();
        let usecase = ScheduleCampaignUseCase::new(repo.clone());
        let request = || ScheduleCampaignRequest {
            user_id,
            campaign_id: campaign.id,
            scheduled_at: Utc::now(),
        };

        let scheduled = usecase.execute(request()).await.unwrap();
        assert_eq!(scheduled.status, CampaignStatus::Scheduled);
        let stored = repo.get(campaign.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CampaignStatus::Scheduled);
        assert!(stored.scheduled_at.is_some());

        let err = usecase.execute(request()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::WrongStatus(CampaignStatus::Scheduled))
        ));
    }
}
