use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    models::{Campaign, Recipient},
    repositories::CampaignRepository,
};

/// Largest delay the campaign store can hold.
const MAX_DELAY_MS: u64 = i64::MAX as u64;

pub struct CreateCampaignConfig {
    pub default_delay_ms: u64,
}

pub struct CreateCampaignUseCase {
    repo: Arc<dyn CampaignRepository>,
    config: CreateCampaignConfig,
}

pub struct CreateCampaignRequest {
    pub user_id: Uuid,
    pub name: String,
    pub message: String,
    pub recipients: Vec<Recipient>,
    pub delay_ms: Option<u64>,
}

impl CreateCampaignUseCase {
    pub fn new(repo: Arc<dyn CampaignRepository>, config: CreateCampaignConfig) -> Self {
        Self { repo, config }
    }

    /// Stores a draft. Message and recipients are checked at dispatch time.
    pub async fn execute(&self, request: CreateCampaignRequest) -> anyhow::Result<Campaign> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("campaign name is required".to_string()).into());
        }

        let delay_ms = request.delay_ms.unwrap_or(self.config.default_delay_ms);
        if delay_ms > MAX_DELAY_MS {
            return Err(DomainError::Validation(format!(
                "delay must not exceed {MAX_DELAY_MS} ms"
            ))
            .into());
        }

        let campaign = Campaign::draft(
            request.user_id,
            name.to_string(),
            request.message,
            request.recipients,
            delay_ms,
        );
        self.repo.insert(&campaign).await?;
        Ok(campaign)
    }
}
