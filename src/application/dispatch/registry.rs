use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Tracks active runs keyed by campaign id. At most one lease exists per
/// campaign; independent campaigns never contend beyond the map lookup.
#[derive(Debug, Default)]
pub struct RunRegistry {
    active: Mutex<HashMap<Uuid, CancellationToken>>,
    root: CancellationToken,
    idle: Notify,
}

impl RunRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn try_claim(self: &Arc<Self>, campaign_id: Uuid) -> Option<RunLease> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.contains_key(&campaign_id) {
            return None;
        }

        let token = self.root.child_token();
        active.insert(campaign_id, token.clone());
        Some(RunLease {
            registry: Arc::clone(self),
            campaign_id,
            token,
        })
    }

    /// Signals the active run for `campaign_id`. Returns false if none is active.
    pub fn cancel(&self, campaign_id: Uuid) -> bool {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.get(&campaign_id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, campaign_id: Uuid) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&campaign_id)
    }

    /// Cancels every active run. Runs still record their final state; use
    /// [`RunRegistry::wait_idle`] to wait for that.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    pub fn active_count(&self) -> usize {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolves once no lease is held.
    pub async fn wait_idle(&self) {
        loop {
            let released = self.idle.notified();
            tokio::pin!(released);
            released.as_mut().enable();
            if self.active_count() == 0 {
                return;
            }
            released.await;
        }
    }

    fn release(&self, campaign_id: Uuid) {
        let now_idle = {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            active.remove(&campaign_id);
            active.is_empty()
        };
        debug!(%campaign_id, "run lease released");
        if now_idle {
            self.idle.notify_waiters();
        }
    }
}

/// Exclusive right to run one campaign. Dropping it frees the campaign.
#[derive(Debug)]
pub struct RunLease {
    registry: Arc<RunRegistry>,
    campaign_id: Uuid,
    token: CancellationToken,
}

impl RunLease {
    pub fn campaign_id(&self) -> Uuid {
        self.campaign_id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for RunLease {
    fn drop(&mut self) {
        self.registry.release(self.campaign_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_lease_per_campaign() {
        let registry = RunRegistry::new();
        let id = Uuid::new_v4();

        let lease = registry.try_claim(id).unwrap();
        assert!(registry.try_claim(id).is_none());
        assert!(registry.is_active(id));

        drop(lease);
        assert!(!registry.is_active(id));
        assert!(registry.try_claim(id).is_some());
    }

    #[test]
    fn independent_campaigns_do_not_contend() {
        let registry = RunRegistry::new();
        let first = registry.try_claim(Uuid::new_v4());
        let second = registry.try_claim(Uuid::new_v4());
        assert!(first.is_some() && second.is_some());
    }

    #[test]
    fn cancel_reaches_only_the_named_run() {
        let registry = RunRegistry::new();
        let a = registry.try_claim(Uuid::new_v4()).unwrap();
        let b = registry.try_claim(Uuid::new_v4()).unwrap();

        assert!(registry.cancel(a.campaign_id()));
        assert!(a.token().is_cancelled());
        assert!(!b.token().is_cancelled());
        assert!(!registry.cancel(Uuid::new_v4()));
    }

    #[test]
    fn shutdown_cancels_every_run() {
        let registry = RunRegistry::new();
        let a = registry.try_claim(Uuid::new_v4()).unwrap();
        let b = registry.try_claim(Uuid::new_v4()).unwrap();

        registry.shutdown();
        assert!(a.token().is_cancelled() && b.token().is_cancelled());
    }

    #[tokio::test]
    async fn wait_idle_resolves_after_last_release() {
        let registry = RunRegistry::new();
        registry.wait_idle().await;

        let lease = registry.try_claim(Uuid::new_v4()).unwrap();
        let waiter = tokio::spawn({
            let registry = Arc::clone(&registry);
            async move { registry.wait_idle().await }
        });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(lease);
        waiter.await.unwrap();
        assert_eq!(registry.active_count(), 0);
    }
}
