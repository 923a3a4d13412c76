use crate::traits::MintStats;
use std::future::Future;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct WorkerRunner;

impl WorkerRunner {
    /// Runs a mint job to completion, cancelling it on Ctrl+C, then logs a summary.
    pub async fn run<F, Fut>(job: F) -> MintStats
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = MintStats>,
    {
        // Create a cancellation token for graceful shutdown
        let token = CancellationToken::new();
        let cloned_token = token.clone();

        // Spawn a task to listen for Ctrl+C
        let listener = tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("🛑 Received Ctrl+C. Initiating graceful shutdown...");
                    cloned_token.cancel();
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });

        let stats = Self::run_with_token(token, job).await;
        listener.abort();
        stats
    }

    /// Same as [`WorkerRunner::run`] with a caller-owned token and no signal handler.
    pub async fn run_with_token<F, Fut>(token: CancellationToken, job: F) -> MintStats
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = MintStats>,
    {
        let start_time = std::time::Instant::now();
        info!("Starting minter...");

        let stats = job(token.clone()).await;

        let total_duration = start_time.elapsed();
        let total = stats.attempts();
        let rate = if total > 0 {
            (stats.confirmed as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        if token.is_cancelled() {
            info!("🛑 Shutdown Complete (cancelled).");
        } else {
            info!("All wallets processed.");
        }
        info!(
            "Total Time: {:.1}s | Wallets: {} | Confirmed: {} | Failed: {} | Out of funds: {} | Skipped: {} | Success Rate: {:.2}%",
            total_duration.as_secs_f64(),
            stats.wallets,
            stats.confirmed,
            stats.failed,
            stats.abandoned_wallets,
            stats.skipped_wallets,
            rate
        );

        stats
    }
}
