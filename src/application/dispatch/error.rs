use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{CampaignRun, CampaignStatus};

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Rejected before any state transition; the campaign stays where it was.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("campaign {campaign_id} cannot be dispatched while {status}")]
    InvalidState {
        campaign_id: Uuid,
        status: CampaignStatus,
    },
    #[error("campaign not found: {0}")]
    NotFound(Uuid),
    #[error("campaign {0} belongs to another user")]
    Forbidden(Uuid),
    /// The queue could not be processed at all.
    #[error("run fault: {0:#}")]
    RunFault(anyhow::Error),
    /// The run reached a terminal status but the final write failed. The
    /// ledger travels with the error.
    #[error("run ended as {status} but was not persisted: {cause:#}")]
    Unpersisted {
        status: CampaignStatus,
        run: Box<CampaignRun>,
        cause: anyhow::Error,
    },
}
