use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{models::Campaign, repositories::CampaignRepository};

pub struct ListCampaignsUseCase {
    repo: Arc<dyn CampaignRepository>,
}

impl ListCampaignsUseCase {
    pub fn new(repo: Arc<dyn CampaignRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<Vec<Campaign>> {
        self.repo.list_by_user(user_id).await
    }
}
