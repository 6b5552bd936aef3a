use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{outcome::DeliveryOutcome, recipient::Recipient};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Scheduled => "scheduled",
            CampaignStatus::Running => "running",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Failed => "failed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(CampaignStatus::Draft),
            "scheduled" => Some(CampaignStatus::Scheduled),
            "running" => Some(CampaignStatus::Running),
            "completed" => Some(CampaignStatus::Completed),
            "failed" => Some(CampaignStatus::Failed),
            "cancelled" => Some(CampaignStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CampaignStatus::Completed | CampaignStatus::Failed | CampaignStatus::Cancelled
        )
    }

    /// Forward-only lifecycle. `Failed` is also reachable straight from a
    /// pre-run state when the run cannot start at all.
    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;

        matches!(
            (self, next),
            (Draft, Scheduled)
                | (Draft | Scheduled, Running)
                | (Draft | Scheduled, Failed)
                | (Running, Completed | Failed | Cancelled)
        )
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub message: String,
    pub recipients: Vec<Recipient>,
    pub status: CampaignStatus,
    pub delay_ms: u64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub results: Vec<DeliveryOutcome>,
    pub total_recipients: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn draft(
        user_id: Uuid,
        name: String,
        message: String,
        recipients: Vec<Recipient>,
        delay_ms: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            message,
            total_recipients: recipients.len() as u32,
            recipients,
            status: CampaignStatus::Draft,
            delay_ms,
            scheduled_at: None,
            results: Vec::new(),
            success_count: 0,
            failure_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
