use crate::domain::models::{CampaignRun, DeliveryOutcome};

use super::{
    DispatchError,
    lifecycle::{self, RunEnd},
};

/// Sole writer of a run's ledger and counters. The ledger is the history of
/// `deliver` calls in order; the counters summarize it.
#[derive(Debug)]
pub struct ResultAccumulator {
    run: CampaignRun,
}

impl ResultAccumulator {
    pub fn new(run: CampaignRun) -> Self {
        Self { run }
    }

    pub fn record(&mut self, outcome: DeliveryOutcome) {
        debug_assert!(
            self.run.ledger.len() < self.run.queue.len(),
            "more outcomes than queued recipients"
        );

        if outcome.is_success() {
            self.run.success_count += 1;
        } else {
            self.run.failure_count += 1;
        }
        self.run.ledger.push(outcome);
    }

    /// Current, possibly in-progress, state of the run.
    pub fn snapshot(&self) -> &CampaignRun {
        &self.run
    }

    /// Closes the run with the terminal status matching `end`.
    pub fn finish(mut self, end: RunEnd) -> Result<CampaignRun, DispatchError> {
        lifecycle::finish(&mut self.run, end)?;
        Ok(self.run)
    }
}
