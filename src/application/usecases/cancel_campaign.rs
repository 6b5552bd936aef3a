use std::sync::Arc;

use uuid::Uuid;

use crate::{
    application::{dispatch::DispatchError, handlers::campaign_dispatcher::CampaignDispatcher},
    domain::repositories::CampaignRepository,
};

use super::dispatch_campaign::ensure_owner;

pub struct CancelCampaignUseCase {
    repo: Arc<dyn CampaignRepository>,
    dispatcher: Arc<CampaignDispatcher>,
}

pub struct CancelCampaignRequest {
    pub user_id: Uuid,
    pub campaign_id: Uuid,
}

impl CancelCampaignUseCase {
    pub fn new(repo: Arc<dyn CampaignRepository>, dispatcher: Arc<CampaignDispatcher>) -> Self {
        Self { repo, dispatcher }
    }

    /// Signals the active run. The run itself records the `Cancelled` status
    /// when it stops.
    pub async fn execute(&self, request: CancelCampaignRequest) -> Result<(), DispatchError> {
        let campaign =
            ensure_owner(self.repo.as_ref(), request.campaign_id, request.user_id).await?;

        if !self.dispatcher.cancel(campaign.id) {
            return Err(DispatchError::InvalidState {
                campaign_id: campaign.id,
                status: campaign.status,
            });
        }
        Ok(())
    }
}
