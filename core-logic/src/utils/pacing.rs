//! # Core Logic - Pacing
//!
//! Randomized waits between gas polls, attempts and wallets. Every wait is a
//! tokio timer raced against the run's cancellation token.

use crate::config::DelayWindow;
use crate::error::MintError;
use crate::traits::{MintLog, Randomness};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseReason {
    GasCeiling,
    BetweenAttempts,
    BetweenWallets,
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PauseReason::GasCeiling => "waiting for gas price",
            PauseReason::BetweenAttempts => "before next attempt",
            PauseReason::BetweenWallets => "before next wallet",
        };
        f.write_str(label)
    }
}

pub struct PacingScheduler {
    rng: Box<dyn Randomness>,
    log: Arc<dyn MintLog>,
    token: CancellationToken,
}

impl PacingScheduler {
    pub fn new(
        rng: Box<dyn Randomness>,
        log: Arc<dyn MintLog>,
        token: CancellationToken,
    ) -> Self {
        Self { rng, log, token }
    }

    /// Whole seconds drawn uniformly from `[min, max]`.
    pub fn delay(&mut self, window: DelayWindow) -> Duration {
        let (lo, hi) = if window.min <= window.max {
            (window.min, window.max)
        } else {
            (window.max, window.min)
        };
        Duration::from_secs(self.rng.uniform_u64(lo, hi))
    }

    /// Picks a delay, logs it, and sleeps unless the run is cancelled first.
    pub async fn wait(
        &mut self,
        reason: PauseReason,
        window: DelayWindow,
    ) -> Result<Duration, MintError> {
        if self.token.is_cancelled() {
            return Err(MintError::Cancelled);
        }

        let delay = self.delay(window);
        self.log.info(&format!(
            "Sleeping for {} seconds ({})...",
            delay.as_secs(),
            reason
        ));

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(MintError::Cancelled),
            _ = sleep(delay) => Ok(delay),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingLog, ScriptedRandomness};
    use crate::utils::ThreadRandomness;

    fn scheduler(rng: Box<dyn Randomness>) -> (PacingScheduler, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::new());
        let pacer = PacingScheduler::new(rng, log.clone(), CancellationToken::new());
        (pacer, log)
    }

    #[test]
    fn test_delay_within_window() {
        let (mut pacer, _) = scheduler(Box::new(ThreadRandomness::seeded(42)));
        for _ in 0..500 {
            let secs = pacer.delay(DelayWindow::new(10, 30)).as_secs();
            assert!((10..=30).contains(&secs));
        }
    }

    #[test]
    fn test_delay_degenerate_window() {
        let (mut pacer, _) = scheduler(Box::new(ThreadRandomness::seeded(1)));
        for _ in 0..50 {
            assert_eq!(pacer.delay(DelayWindow::new(4, 4)), Duration::from_secs(4));
        }
    }

    #[test]
    fn test_delay_reversed_window_is_normalised() {
        let (mut pacer, _) = scheduler(Box::new(ThreadRandomness::seeded(3)));
        for _ in 0..100 {
            let secs = pacer.delay(DelayWindow::new(6, 5)).as_secs();
            assert!((5..=6).contains(&secs));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_logs_and_sleeps() {
        let (mut pacer, log) = scheduler(Box::new(ScriptedRandomness::new().with_ints([12])));
        let start = tokio::time::Instant::now();

        let waited = pacer
            .wait(PauseReason::BetweenAttempts, DelayWindow::new(10, 30))
            .await
            .unwrap();

        assert_eq!(waited, Duration::from_secs(12));
        assert!(start.elapsed() >= Duration::from_secs(12));
        assert_eq!(
            log.infos(),
            vec!["Sleeping for 12 seconds (before next attempt)...".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_honours_cancellation() {
        let log = Arc::new(RecordingLog::new());
        let token = CancellationToken::new();
        let mut pacer = PacingScheduler::new(
            Box::new(ScriptedRandomness::new()),
            log.clone(),
            token.clone(),
        );

        token.cancel();
        let res = pacer
            .wait(PauseReason::BetweenWallets, DelayWindow::new(60, 60))
            .await;

        assert!(matches!(res, Err(MintError::Cancelled)));
        assert!(log.infos().is_empty());
    }
}
