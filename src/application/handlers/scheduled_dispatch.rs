use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    application::{dispatch::DispatchError, handlers::campaign_dispatcher::CampaignDispatcher},
    domain::repositories::CampaignRepository,
};

/// Periodically starts runs for scheduled campaigns whose time has come.
pub struct ScheduledDispatchWorker {
    campaign_repo: Arc<dyn CampaignRepository>,
    dispatcher: Arc<CampaignDispatcher>,
    interval: Duration,
    runs: JoinSet<()>,
}

impl ScheduledDispatchWorker {
    pub fn new(
        campaign_repo: Arc<dyn CampaignRepository>,
        dispatcher: Arc<CampaignDispatcher>,
        interval: Duration,
    ) -> Self {
        Self {
            campaign_repo,
            dispatcher,
            interval,
            runs: JoinSet::new(),
        }
    }

    /// Runs until `shutdown` fires, then waits for the runs it started to
    /// record their final state.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn run(mut self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(joined) = self.runs.join_next(), if !self.runs.is_empty() => {
                    if let Err(err) = joined {
                        error!(error = %err, "scheduled run task failed");
                    }
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.tick().await {
                        error!(error = %err, "failed to load due campaigns");
                    }
                }
            }
        }

        info!(pending = self.runs.len(), "scheduled dispatch worker stopping");
        self.settle().await;
        info!("scheduled dispatch worker stopped");
    }

    /// Starts a run for every due campaign not already running. Returns how
    /// many were started.
    pub async fn tick(&mut self) -> anyhow::Result<usize> {
        let due = self.campaign_repo.list_due(Utc::now()).await?;
        let mut started = 0;

        for campaign in due {
            if self.dispatcher.registry().is_active(campaign.id) {
                continue;
            }

            let dispatcher = Arc::clone(&self.dispatcher);
            let campaign_id = campaign.id;
            info!(%campaign_id, "starting scheduled campaign");
            self.runs.spawn(async move {
                match dispatcher.dispatch(campaign_id).await {
                    Ok(run) => debug!(%campaign_id, status = %run.status(), "scheduled run finished"),
                    Err(DispatchError::InvalidState { status, .. }) => {
                        debug!(%campaign_id, %status, "scheduled campaign skipped")
                    }
                    Err(err) => warn!(%campaign_id, error = %err, "scheduled run did not complete"),
                }
            });
            started += 1;
        }

        Ok(started)
    }

    /// Waits for every run started by this worker to finish.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.runs.join_next().await {
            if let Err(err) = joined {
                error!(error = %err, "scheduled run task failed");
            }
        }
    }
}
