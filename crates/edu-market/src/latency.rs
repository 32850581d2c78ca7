//! Simulated request latency and stale-response fencing.

use crate::config::LatencyConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A simulated request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedFailure;

/// Waits `base + uniform(0..=jitter)` and fails with the configured
/// probability.
#[derive(Debug)]
pub struct SimulatedLatency {
    config: LatencyConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedLatency {
    pub fn new(config: LatencyConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &LatencyConfig {
        &self.config
    }

    /// Draw the delay and outcome for one request.
    pub fn sample(&self) -> (Duration, Result<(), SimulatedFailure>) {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let jitter = if self.config.jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..=self.config.jitter_ms)
        };
        let delay = Duration::from_millis(self.config.base_ms.saturating_add(jitter));

        let failure_rate = self.config.failure_rate.clamp(0.0, 1.0);
        let outcome = if failure_rate > 0.0 && rng.gen_bool(failure_rate) {
            Err(SimulatedFailure)
        } else {
            Ok(())
        };
        (delay, outcome)
    }

    /// Sleep for one sampled delay, then report the sampled outcome.
    pub async fn wait(&self) -> Result<Duration, SimulatedFailure> {
        let (delay, outcome) = self.sample();
        tokio::time::sleep(delay).await;
        outcome.map(|()| delay)
    }
}

/// Sequence number of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Decides whether a resolving request may publish its result.
///
/// Unfenced, every resolution is applied, so the last request to resolve
/// wins even if it was issued first. Fenced, a resolution is applied only if
/// no newer request has already been applied.
#[derive(Debug)]
pub struct RequestGate {
    fenced: bool,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RequestGate {
    pub fn new(fenced: bool) -> Self {
        Self {
            fenced,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    pub fn is_fenced(&self) -> bool {
        self.fenced
    }

    /// Issue the next ticket. Tickets start at 1.
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` may publish. Records it as the newest applied.
    pub fn admit(&self, ticket: Ticket) -> bool {
        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        !self.fenced || previous < ticket.0
    }

    /// Whether `ticket` is the most recently issued request.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}
