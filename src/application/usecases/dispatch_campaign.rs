use std::sync::Arc;

use uuid::Uuid;

use crate::{
    application::{dispatch::DispatchError, handlers::campaign_dispatcher::CampaignDispatcher},
    domain::{
        errors::DomainError,
        models::{Campaign, CampaignRun},
        repositories::CampaignRepository,
    },
};

use super::load_owned;

pub struct DispatchCampaignUseCase {
    repo: Arc<dyn CampaignRepository>,
    dispatcher: Arc<CampaignDispatcher>,
}

pub struct DispatchCampaignRequest {
    pub user_id: Uuid,
    pub campaign_id: Uuid,
}

impl DispatchCampaignUseCase {
    pub fn new(repo: Arc<dyn CampaignRepository>, dispatcher: Arc<CampaignDispatcher>) -> Self {
        Self { repo, dispatcher }
    }

    /// Long-running: returns once every recipient has been processed or the
    /// run was cancelled.
    pub async fn execute(
        &self,
        request: DispatchCampaignRequest,
    ) -> Result<CampaignRun, DispatchError> {
        ensure_owner(self.repo.as_ref(), request.campaign_id, request.user_id).await?;

        // Own task: a dropped request must not abandon a run mid-way.
        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(async move { dispatcher.dispatch(request.campaign_id).await })
            .await
            .map_err(|err| DispatchError::RunFault(err.into()))?
    }
}

pub(crate) async fn ensure_owner(
    repo: &dyn CampaignRepository,
    campaign_id: Uuid,
    user_id: Uuid,
) -> Result<Campaign, DispatchError> {
    load_owned(repo, campaign_id, user_id)
        .await
        .map_err(|err| match err.downcast_ref::<DomainError>() {
            Some(DomainError::NotFound(_)) => DispatchError::NotFound(campaign_id),
            Some(DomainError::Forbidden(_)) => DispatchError::Forbidden(campaign_id),
            _ => DispatchError::RunFault(err),
        })
}
