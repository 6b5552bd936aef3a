use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::dispatch::{
        DeliveryExecutor, DispatchError, RecipientQueue, ResultAccumulator, RunRegistry,
        lifecycle::{self, RunEnd},
        pacing::{self, Pace},
    },
    domain::{
        errors::DomainError,
        models::{CampaignRun, CampaignStatus, GatewaySession},
        repositories::{CampaignRepository, SessionRepository},
    },
};

#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    /// Write the ledger back after every delivery, not only at the end.
    pub persist_progress: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            persist_progress: true,
        }
    }
}

pub struct CampaignDispatcher {
    campaign_repo: Arc<dyn CampaignRepository>,
    session_repo: Arc<dyn SessionRepository>,
    executor: DeliveryExecutor,
    registry: Arc<RunRegistry>,
    options: DispatchOptions,
}

impl CampaignDispatcher {
    pub fn new(
        campaign_repo: Arc<dyn CampaignRepository>,
        session_repo: Arc<dyn SessionRepository>,
        executor: DeliveryExecutor,
        registry: Arc<RunRegistry>,
        options: DispatchOptions,
    ) -> Self {
        Self {
            campaign_repo,
            session_repo,
            executor,
            registry,
            options,
        }
    }

    pub fn registry(&self) -> &Arc<RunRegistry> {
        &self.registry
    }

    pub fn cancel(&self, campaign_id: Uuid) -> bool {
        let signalled = self.registry.cancel(campaign_id);
        if signalled {
            info!(%campaign_id, "cancellation requested");
        }
        signalled
    }

    /// Runs the campaign to a terminal status and returns the final run.
    ///
    /// Errors before the `Running` transition leave the stored campaign
    /// untouched. After it, per-recipient failures are recorded in the ledger
    /// and the caller always gets the run back, either directly or inside
    /// `DispatchError::Unpersisted`.
    #[instrument(skip(self), fields(campaign_id = %campaign_id))]
    pub async fn dispatch(&self, campaign_id: Uuid) -> Result<CampaignRun, DispatchError> {
        if self.registry.is_shut_down() {
            return Err(DispatchError::RunFault(anyhow::anyhow!(
                "dispatch is shutting down"
            )));
        }
        let lease = self
            .registry
            .try_claim(campaign_id)
            .ok_or(DispatchError::InvalidState {
                campaign_id,
                status: CampaignStatus::Running,
            })?;

        let campaign = self
            .campaign_repo
            .get(campaign_id)
            .await
            .map_err(DispatchError::RunFault)?
            .ok_or(DispatchError::NotFound(campaign_id))?;

        if !campaign.status.can_transition_to(CampaignStatus::Running) {
            return Err(DispatchError::InvalidState {
                campaign_id,
                status: campaign.status,
            });
        }
        if campaign.message.trim().is_empty() {
            return Err(DispatchError::InvalidInput(
                "campaign message is empty".to_string(),
            ));
        }
        let queue = RecipientQueue::build(campaign.recipients.clone())?;

        let session = self
            .session_repo
            .find_by_user(&campaign.user_id)
            .await
            .map_err(DispatchError::RunFault)?
            .ok_or_else(|| {
                DispatchError::InvalidInput(
                    "no gateway session registered for campaign owner".to_string(),
                )
            })?;

        let mut accumulator = ResultAccumulator::new(lifecycle::begin(&campaign, queue)?);
        if let Err(err) = self.campaign_repo.save_run(accumulator.snapshot()).await {
            error!(error = %err, "failed to mark campaign running");
            return Err(DispatchError::RunFault(err));
        }
        info!(
            recipients = accumulator.snapshot().total_recipients(),
            delay_ms = campaign.delay_ms,
            "campaign run started"
        );

        let end = self
            .drain(&campaign.message, &session, &mut accumulator, lease.token())
            .await;

        if let RunEnd::Faulted(err) = &end {
            error!(error = %format!("{err:#}"), "campaign run faulted");
        }
        let run = accumulator.finish(end)?;
        info!(
            status = %run.status(),
            success = run.success_count(),
            failure = run.failure_count(),
            attempted = run.ledger().len(),
            "campaign run finished"
        );

        match self.campaign_repo.save_run(&run).await {
            Ok(()) => Ok(run),
            Err(cause) => {
                error!(error = %cause, status = %run.status(), "failed to persist finished run");
                Err(DispatchError::Unpersisted {
                    status: run.status(),
                    run: Box::new(run),
                    cause,
                })
            }
        }
    }

    async fn drain(
        &self,
        message: &str,
        session: &GatewaySession,
        accumulator: &mut ResultAccumulator,
        cancel: &CancellationToken,
    ) -> RunEnd {
        let total = accumulator.snapshot().queue().len();
        let delay = accumulator.snapshot().per_message_delay();

        for position in 0..total {
            if cancel.is_cancelled() {
                info!(position, "run cancelled before delivery");
                return RunEnd::Cancelled;
            }

            let recipient = accumulator.snapshot().queue()[position].clone();
            let outcome = self.executor.deliver(&recipient, message, session).await;
            accumulator.record(outcome);

            if self.options.persist_progress {
                if let Err(err) = self.campaign_repo.save_run(accumulator.snapshot()).await {
                    // A vanished record cannot take further progress.
                    if matches!(err.downcast_ref::<DomainError>(), Some(DomainError::NotFound(_))) {
                        return RunEnd::Faulted(err.context("campaign disappeared mid-run"));
                    }
                    warn!(error = %err, position, "failed to persist run progress");
                }
            }

            if position + 1 < total
                && pacing::wait_between(delay, cancel).await == Pace::Interrupted
            {
                info!(position, "run cancelled during pacing wait");
                return RunEnd::Cancelled;
            }
        }

        RunEnd::Drained
    }
}
