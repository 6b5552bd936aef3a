use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{CampaignStatus, DeliveryOutcome, Recipient};

/// State of one dispatch run. Created fresh per dispatch, mutated only by
/// the engine, written back to the campaign store at every terminal step.
///
/// `success_count + failure_count == ledger.len() <= queue.len()` holds at
/// every observable point.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignRun {
    pub(crate) campaign_id: Uuid,
    pub(crate) status: CampaignStatus,
    pub(crate) queue: Vec<Recipient>,
    pub(crate) ledger: Vec<DeliveryOutcome>,
    pub(crate) success_count: u32,
    pub(crate) failure_count: u32,
    #[serde(with = "duration_ms")]
    pub(crate) per_message_delay: Duration,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) finished_at: Option<DateTime<Utc>>,
    pub(crate) fault: Option<String>,
}

impl CampaignRun {
    pub fn campaign_id(&self) -> Uuid {
        self.campaign_id
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub fn queue(&self) -> &[Recipient] {
        &self.queue
    }

    pub fn ledger(&self) -> &[DeliveryOutcome] {
        &self.ledger
    }

    pub fn total_recipients(&self) -> u32 {
        self.queue.len() as u32
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn per_message_delay(&self) -> Duration {
        self.per_message_delay
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Reason recorded when the run ended in `Failed`.
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
