use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{models::Campaign, repositories::CampaignRepository};

use super::load_owned;

pub struct GetCampaignUseCase {
    repo: Arc<dyn CampaignRepository>,
}

impl GetCampaignUseCase {
    pub fn new(repo: Arc<dyn CampaignRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, campaign_id: Uuid, user_id: Uuid) -> anyhow::Result<Campaign> {
        load_owned(self.repo.as_ref(), campaign_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{errors::DomainError, models::Recipient},
        infrastructure::repositories::in_memory::InMemoryCampaignRepository,
    };

    #[tokio::test]
    async fn only_the_owner_can_read_a_campaign() {
        let repo = Arc::new(InMemoryCampaignRepository::new());
        let owner = Uuid::new_v4();
        let campaign = Campaign::draft(
            owner,
            "launch".to_string(),
            "hello".to_string(),
            vec![Recipient::new("111@c.us", false)],
            0,
        );
        repo.insert(&campaign).await.unwrap();
        let usecase = GetCampaignUseCase::new(repo);

        assert_eq!(usecase.execute(campaign.id, owner).await.unwrap().id, campaign.id);

        let err = usecase.execute(campaign.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Forbidden(_))
        ));

        let err = usecase.execute(Uuid::new_v4(), owner).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound(_))
        ));
    }
}
