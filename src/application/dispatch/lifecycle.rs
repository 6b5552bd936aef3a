use chrono::Utc;

use crate::domain::models::{Campaign, CampaignRun, CampaignStatus};

use super::{DispatchError, queue::RecipientQueue};

/// How the delivery loop stopped.
#[derive(Debug)]
pub enum RunEnd {
    Drained,
    Cancelled,
    Faulted(anyhow::Error),
}

/// Seeds a run from the stored campaign and moves it to `Running`.
pub fn begin(campaign: &Campaign, queue: RecipientQueue) -> Result<CampaignRun, DispatchError> {
    let mut run = CampaignRun {
        campaign_id: campaign.id,
        status: campaign.status,
        ledger: Vec::with_capacity(queue.len()),
        queue: queue.into_inner(),
        success_count: 0,
        failure_count: 0,
        per_message_delay: campaign.delay(),
        started_at: None,
        finished_at: None,
        fault: None,
    };
    transition(&mut run, CampaignStatus::Running)?;
    Ok(run)
}

pub fn transition(run: &mut CampaignRun, next: CampaignStatus) -> Result<(), DispatchError> {
    if !run.status.can_transition_to(next) {
        return Err(DispatchError::InvalidState {
            campaign_id: run.campaign_id,
            status: run.status,
        });
    }

    let now = Utc::now();
    if next == CampaignStatus::Running {
        run.started_at = Some(now);
    } else if next.is_terminal() {
        run.finished_at = Some(now);
    }
    run.status = next;
    Ok(())
}

pub fn fail(run: &mut CampaignRun, reason: impl Into<String>) -> Result<(), DispatchError> {
    transition(run, CampaignStatus::Failed)?;
    run.fault = Some(reason.into());
    Ok(())
}

/// Applies the terminal transition matching how the loop stopped.
pub fn finish(run: &mut CampaignRun, end: RunEnd) -> Result<(), DispatchError> {
    match end {
        RunEnd::Drained => transition(run, CampaignStatus::Completed),
        RunEnd::Cancelled => transition(run, CampaignStatus::Cancelled),
        RunEnd::Faulted(err) => fail(run, format!("{err:#}")),
    }
}
