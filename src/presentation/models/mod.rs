use poem_openapi::Enum;

use crate::domain::models::{CampaignStatus, DeliveryStatus};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum CampaignStatusKind {
    #[oai(rename = "draft")]
    Draft,
    #[oai(rename = "scheduled")]
    Scheduled,
    #[oai(rename = "running")]
    Running,
    #[oai(rename = "completed")]
    Completed,
    #[oai(rename = "failed")]
    Failed,
    #[oai(rename = "cancelled")]
    Cancelled,
}

impl From<CampaignStatus> for CampaignStatusKind {
    fn from(value: CampaignStatus) -> Self {
        match value {
            CampaignStatus::Draft => CampaignStatusKind::Draft,
            CampaignStatus::Scheduled => CampaignStatusKind::Scheduled,
            CampaignStatus::Running => CampaignStatusKind::Running,
            CampaignStatus::Completed => CampaignStatusKind::Completed,
            CampaignStatus::Failed => CampaignStatusKind::Failed,
            CampaignStatus::Cancelled => CampaignStatusKind::Cancelled,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum DeliveryStatusKind {
    #[oai(rename = "success")]
    Success,
    #[oai(rename = "failed")]
    Failed,
}

impl From<DeliveryStatus> for DeliveryStatusKind {
    fn from(value: DeliveryStatus) -> Self {
        match value {
            DeliveryStatus::Success => DeliveryStatusKind::Success,
            DeliveryStatus::Failure => DeliveryStatusKind::Failed,
        }
    }
}
