use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Success,
    Failure,
}

/// One ledger entry. `error` is present iff `status` is `Failure`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub status: DeliveryStatus,
    pub sent_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn success(recipient: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            recipient: recipient.into(),
            status: DeliveryStatus::Success,
            sent_at,
            error: None,
        }
    }

    pub fn failure(
        recipient: impl Into<String>,
        sent_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            status: DeliveryStatus::Failure,
            sent_at,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DeliveryStatus::Success
    }
}
