use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::{CampaignStatusKind, DeliveryStatusKind};

#[derive(Object)]
pub struct RecipientResponseDto {
    pub phone: String,
    pub name: Option<String>,
    pub is_group: bool,
}

#[derive(Object)]
pub struct DeliveryResultDto {
    pub recipient: String,
    pub status: DeliveryStatusKind,
    pub sent_at: String,
    pub error: Option<String>,
}

#[derive(Object)]
pub struct CampaignDto {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub recipients: Vec<RecipientResponseDto>,
    pub status: CampaignStatusKind,
    pub delay: u64,
    pub scheduled_at: Option<String>,
    pub total_recipients: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub results: Vec<DeliveryResultDto>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
pub struct CampaignRunDto {
    pub campaign_id: Uuid,
    pub status: CampaignStatusKind,
    pub total_recipients: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub results: Vec<DeliveryResultDto>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub fault: Option<String>,
    /// False when the final state could not be written to the store.
    pub persisted: bool,
}

#[derive(Object)]
pub struct GatewaySessionDto {
    pub session_name: String,
    pub updated_at: String,
}
