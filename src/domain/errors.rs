use thiserror::Error;

use crate::domain::models::CampaignStatus;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Entity already exists: {0}")]
    AlreadyExists(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Operation not allowed: {0}")]
    Forbidden(String),
    /// The campaign's current status does not allow the requested change.
    #[error("Campaign is {0}")]
    WrongStatus(CampaignStatus),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
