pub mod cancel_campaign;
pub mod create_campaign;
pub mod dispatch_campaign;
pub mod get_campaign;
pub mod list_campaigns;
pub mod register_session;
pub mod schedule_campaign;

use uuid::Uuid;

use crate::domain::{errors::DomainError, models::Campaign, repositories::CampaignRepository};

/// Loads a campaign and checks it belongs to `user_id`.
pub(crate) async fn load_owned(
    repo: &dyn CampaignRepository,
    campaign_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<Campaign> {
    let campaign = repo
        .get(campaign_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("campaign {campaign_id}")))?;

    if campaign.user_id != user_id {
        return Err(DomainError::Forbidden(format!(
            "campaign {campaign_id} does not belong to user"
        ))
        .into());
    }
    Ok(campaign)
}
