//! Deterministic doubles for the logging, randomness and gas price seams.
//! Compiled for unit tests and behind the `testing` feature.

use crate::error::NetworkError;
use crate::traits::{GasPriceSource, MintLog, Randomness};
use crate::utils::gwei_to_wei;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Success,
}

/// Keeps every message in order so tests can assert on the log transcript.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((severity, message.to_string()));
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages(Severity::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Severity::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Severity::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(Severity::Success)
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries()
            .iter()
            .filter(|(_, m)| m.contains(needle))
            .count()
    }
}

impl MintLog for RecordingLog {
    fn error(&self, message: &str) {
        self.push(Severity::Error, message);
    }

    fn warn(&self, message: &str) {
        self.push(Severity::Warn, message);
    }

    fn info(&self, message: &str) {
        self.push(Severity::Info, message);
    }

    fn success(&self, message: &str) {
        self.push(Severity::Success, message);
    }
}

/// Replays queued draws. Integers are clamped into the requested range;
/// floats are fractions in `[0, 1)` scaled onto it. Exhausted queues yield
/// the lower bound.
#[derive(Debug, Default)]
pub struct ScriptedRandomness {
    ints: VecDeque<u64>,
    fractions: VecDeque<f64>,
}

impl ScriptedRandomness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ints(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.ints.extend(values);
        self
    }

    pub fn with_fractions(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.fractions.extend(values);
        self
    }
}

impl Randomness for ScriptedRandomness {
    fn uniform_u64(&mut self, min: u64, max: u64) -> u64 {
        match self.ints.pop_front() {
            Some(v) => v.clamp(min, max.max(min)),
            None => min,
        }
    }

    fn uniform_f64(&mut self, low: f64, high: f64) -> f64 {
        match self.fractions.pop_front() {
            Some(f) => low + f.clamp(0.0, 1.0) * (high - low),
            None => low,
        }
    }
}

/// Gas price feed that replays a script, then repeats its final reading.
#[derive(Debug)]
pub struct ScriptedGasSource {
    script: Mutex<VecDeque<Result<u128, NetworkError>>>,
    last: Mutex<Result<u128, NetworkError>>,
    calls: AtomicUsize,
}

impl ScriptedGasSource {
    pub fn new(script: impl IntoIterator<Item = Result<u128, NetworkError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(Ok(0)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_gwei(prices: impl IntoIterator<Item = f64>) -> Self {
        Self::new(prices.into_iter().map(|g| Ok(gwei_to_wei(g))))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GasPriceSource for ScriptedGasSource {
    async fn gas_price_wei(&self) -> Result<u128, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(reading) = next {
            *last = reading;
        }
        last.clone()
    }
}
