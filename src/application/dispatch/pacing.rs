use std::time::Duration;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Elapsed,
    Interrupted,
}

/// Suspends between two delivery attempts. Cancellation wins over the timer,
/// and a zero delay returns without yielding to the timer at all.
pub async fn wait_between(delay: Duration, cancel: &CancellationToken) -> Pace {
    if cancel.is_cancelled() {
        return Pace::Interrupted;
    }
    if delay.is_zero() {
        return Pace::Elapsed;
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Pace::Interrupted,
        _ = tokio::time::sleep(delay) => Pace::Elapsed,
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_full_delay() {
        let cancel = CancellationToken::new();
        let started = Instant::now();

        let pace = wait_between(Duration::from_secs(3), &cancel).await;

        assert_eq!(pace, Pace::Elapsed);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_means_no_pacing() {
        let cancel = CancellationToken::new();
        let started = Instant::now();

        assert_eq!(wait_between(Duration::ZERO, &cancel).await, Pace::Elapsed);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_pending_wait() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let started = Instant::now();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let pace = wait_between(Duration::from_secs(10), &cancel).await;

        assert_eq!(pace, Pace::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn already_cancelled_returns_immediately() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            wait_between(Duration::from_secs(3600), &cancel).await,
            Pace::Interrupted
        );
    }
}
