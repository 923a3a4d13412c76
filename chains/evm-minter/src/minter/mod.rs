//! # Mint Orchestrator
//!
//! Walks the wallets in configured order. Each wallet gets a random number of
//! purchase attempts, every attempt waits for an acceptable gas price first,
//! and randomized pauses separate attempts and wallets. Nothing runs
//! concurrently: one transaction is in flight at a time.

use core_logic::{
    ChainClient, Confirmation, DelayWindow, GasConfig, GasGate, MintConfig, MintError, MintLog,
    MintSettings, MintStats, PacingScheduler, PauseReason, Randomness, ThreadRandomness,
    WalletSlot,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Minter<C: ChainClient> {
    client: C,
    gas_gate: GasGate,
    pacer: PacingScheduler,
    rng: Box<dyn Randomness>,
    log: Arc<dyn MintLog>,
    settings: MintSettings,
    wallet_pause: DelayWindow,
}

impl<C: ChainClient> Minter<C> {
    pub fn new(
        client: C,
        config: &MintConfig,
        log: Arc<dyn MintLog>,
        token: CancellationToken,
    ) -> Self {
        Self::with_randomness(
            client,
            config,
            log,
            token,
            Box::new(ThreadRandomness::new()),
            Box::new(ThreadRandomness::new()),
        )
    }

    /// `rng` drives repetition counts and priority fees, `pacing_rng` the waits.
    pub fn with_randomness(
        client: C,
        config: &MintConfig,
        log: Arc<dyn MintLog>,
        token: CancellationToken,
        rng: Box<dyn Randomness>,
        pacing_rng: Box<dyn Randomness>,
    ) -> Self {
        Self {
            client,
            gas_gate: GasGate::new(GasConfig::from(&config.gas), log.clone()),
            pacer: PacingScheduler::new(pacing_rng, log.clone(), token),
            rng,
            log,
            settings: config.mint.clone(),
            wallet_pause: config.pause,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Processes every slot in order and returns the run's counters.
    /// Stops early only when the cancellation token fires.
    pub async fn run(&mut self, wallets: &[WalletSlot]) -> MintStats {
        let mut stats = MintStats::default();

        for (pos, slot) in wallets.iter().enumerate() {
            stats.wallets += 1;
            self.log.info(&format!(
                "| {} | Wallet {}/{}",
                slot.line,
                pos + 1,
                wallets.len()
            ));

            if let Err(MintError::Cancelled) = self.process_wallet(slot, &mut stats).await {
                self.log
                    .warn(&format!("| {} | Cancelled, stopping run", slot.line));
                break;
            }

            if let Err(MintError::Cancelled) = self
                .pacer
                .wait(PauseReason::BetweenWallets, self.wallet_pause)
                .await
            {
                self.log.warn("Cancelled during wallet pause, stopping run");
                break;
            }
        }

        stats
    }

    /// Runs the attempt loop for one wallet. Only `Cancelled` escapes; every
    /// other failure is logged and folded into `stats`.
    async fn process_wallet(
        &mut self,
        slot: &WalletSlot,
        stats: &mut MintStats,
    ) -> Result<(), MintError> {
        let line = slot.line;
        let signer = match self.client.signer(&slot.key, line) {
            Ok(signer) => signer,
            Err(e) => {
                self.log.error(&format!("| {} | Skipping wallet: {}", line, e));
                stats.skipped_wallets += 1;
                return Ok(());
            }
        };

        let repetitions = self.rng.uniform_u64(
            self.settings.min_repetitions,
            self.settings.max_repetitions,
        );
        self.log.info(&format!(
            "| {} | Planning {} transactions",
            line, repetitions
        ));

        let (confirmed_before, failed_before) = (stats.confirmed, stats.failed);

        for attempt in 1..=repetitions {
            match self.attempt(&signer, line, attempt, repetitions).await {
                Ok(_) => stats.confirmed += 1,
                Err(MintError::Cancelled) => return Err(MintError::Cancelled),
                Err(MintError::InsufficientFunds { reason }) => {
                    stats.failed += 1;
                    stats.abandoned_wallets += 1;
                    self.log.warn(&format!(
                        "| {} | Not enough native for the transaction, dropping {} remaining attempts: {}",
                        line,
                        repetitions - attempt,
                        reason
                    ));
                    break;
                }
                Err(e) => {
                    stats.failed += 1;
                    self.log
                        .error(&format!("| {} | An error occurred: {}", line, e));
                }
            }

            if attempt < repetitions {
                self.pacer
                    .wait(PauseReason::BetweenAttempts, self.settings.attempt_pause())
                    .await?;
            }
        }

        self.log.info(&format!(
            "| {} | Wallet done: {} confirmed, {} failed",
            line,
            stats.confirmed - confirmed_before,
            stats.failed - failed_before
        ));

        Ok(())
    }

    async fn attempt(
        &mut self,
        signer: &C::Signer,
        line: usize,
        attempt: u64,
        repetitions: u64,
    ) -> Result<Confirmation, MintError> {
        if self.pacer.is_cancelled() {
            return Err(MintError::Cancelled);
        }

        let reading = self
            .gas_gate
            .adjusted_gas_price(&self.client, &mut self.pacer)
            .await?;
        let fees = self.gas_gate.quote_fees(reading, self.rng.as_mut());

        self.log.info(&format!(
            "| {} | Attempt {}/{}: gas {:.2} gwei, max fee {} gwei, priority {} gwei",
            line,
            attempt,
            repetitions,
            reading.gwei(),
            fees.max_fee_gwei,
            fees.priority_gwei
        ));

        let submission = self
            .client
            .submit_purchase(signer, self.settings.quantity, &fees)
            .await?;
        self.log.info(&format!(
            "| {} | Transaction hash: {}",
            line, submission.hash
        ));

        let confirmation = self.client.await_confirmation(&submission).await?;
        if !confirmation.success {
            return Err(MintError::Submission {
                reason: format!(
                    "transaction {} reverted in block {}",
                    confirmation.tx_hash, confirmation.block_number
                ),
            });
        }

        self.log.success(&format!(
            "| {} | Transaction was mined in block: {}",
            line, confirmation.block_number
        ));

        Ok(confirmation)
    }
}
