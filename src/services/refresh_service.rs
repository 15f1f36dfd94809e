use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::select;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};

use crate::entity::{
    PriceError, RefreshFailure, RefreshPhase, RefreshSnapshot, TokenIdentifier, TokenWithPrice,
};
use crate::services::aggregation_service::AggregationService;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

type RefreshOutcome = Result<Vec<TokenWithPrice>, PriceError>;
type RefreshCycle = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Polling and retry policy
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RefreshConfig {
    /// Delay before retry number `attempt + 1`: doubles each time, capped at `max_delay`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Keeps the latest prices for a fixed token set and publishes every state change.
pub struct RefreshController {
    aggregation: Arc<dyn AggregationService>,
    tokens: Vec<TokenIdentifier>,
    config: RefreshConfig,
    state_tx: watch::Sender<RefreshSnapshot>,
    in_flight: Mutex<Option<RefreshCycle>>,
}

impl RefreshController {
    pub fn new(
        aggregation: Arc<dyn AggregationService>,
        tokens: Vec<TokenIdentifier>,
        config: RefreshConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(RefreshSnapshot::default());

        Self {
            aggregation,
            tokens,
            config,
            state_tx,
            in_flight: Mutex::new(None),
        }
    }

    pub fn tokens(&self) -> &[TokenIdentifier] {
        &self.tokens
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshSnapshot> {
        self.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Whole seconds since the last successful refresh, if there was one.
    pub fn seconds_since_update(&self, now: DateTime<Utc>) -> Option<i64> {
        self.state_tx
            .borrow()
            .last_updated
            .map(|updated| (now - updated).num_seconds().max(0))
    }

    /// Runs a refresh cycle now. A call made while a cycle is running joins that
    /// cycle instead of starting another one.
    ///
    /// The cycle runs on its own task, so it settles and frees the slot even
    /// when every caller stops waiting for it.
    pub async fn refresh(self: &Arc<Self>) -> RefreshOutcome {
        let cycle = {
            let mut slot = self.in_flight_slot();
            match slot.as_ref() {
                Some(cycle) => {
                    debug!("Refresh already in progress, joining it");
                    cycle.clone()
                }
                None => {
                    let controller = Arc::clone(self);
                    let handle = tokio::spawn(async move {
                        let _release = CycleRelease(Arc::clone(&controller));
                        controller.run_cycle().await
                    });
                    let cycle = async move {
                        match handle.await {
                            Ok(outcome) => outcome,
                            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                            // Only reachable while the runtime shuts down
                            Err(_) => futures::future::pending().await,
                        }
                    }
                    .boxed()
                    .shared();
                    *slot = Some(cycle.clone());
                    cycle
                }
            }
        };

        cycle.await
    }

    fn in_flight_slot(&self) -> MutexGuard<'_, Option<RefreshCycle>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn run_cycle(&self) -> RefreshOutcome {
        let mut attempt = 0;

        loop {
            self.state_tx.send_modify(|state| {
                state.phase = RefreshPhase::Fetching;
                state.attempt = attempt;
            });

            match self.aggregation.get_many(&self.tokens).await {
                Ok(tokens) => {
                    info!("Refreshed prices for {} tokens", tokens.len());
                    let now = Utc::now();
                    self.state_tx.send_modify(|state| {
                        state.phase = RefreshPhase::Idle;
                        state.tokens = tokens.clone();
                        state.last_updated = Some(now);
                        state.last_error = None;
                    });
                    return Ok(tokens);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff_delay(attempt);
                    warn!(
                        "Refresh attempt {} failed: {}. Retrying in {:?}",
                        attempt + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Refresh failed after {} attempt(s): {}", attempt + 1, e);
                    self.state_tx.send_modify(|state| {
                        state.phase = RefreshPhase::Error;
                        state.last_error = Some(RefreshFailure::from(&e));
                    });
                    return Err(e);
                }
            }
        }
    }
}

/// Frees the single-flight slot when a cycle task ends, however it ends.
struct CycleRelease(Arc<RefreshController>);

impl Drop for CycleRelease {
    fn drop(&mut self) {
        self.0.in_flight_slot().take();
        self.0.state_tx.send_if_modified(|state| {
            if state.phase != RefreshPhase::Fetching {
                return false;
            }
            state.phase = if state.last_error.is_some() {
                RefreshPhase::Error
            } else {
                RefreshPhase::Idle
            };
            true
        });
    }
}

/// Background task that refreshes on start and then on every interval tick
pub struct RefreshService {
    controller: Arc<RefreshController>,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshService {
    pub fn new(controller: Arc<RefreshController>) -> Self {
        Self {
            controller,
            stop_tx: None,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    // Start the background refresh loop
    pub fn start(&mut self) -> Result<()> {
        if self.stop_tx.is_some() {
            return Err(anyhow!("Refresh service is already running"));
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let controller = self.controller.clone();
        let period = controller.config().interval;

        self.handle = Some(tokio::spawn(async move {
            // The first tick completes immediately
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_run: Option<Instant> = None;

            loop {
                select! {
                    _ = ticker.tick() => {
                        if let Some(last_run) = last_run {
                            debug!("Running scheduled refresh (last run: {:.2?} ago)", last_run.elapsed());
                        }
                        last_run = Some(Instant::now());

                        select! {
                            outcome = controller.refresh() => {
                                if let Err(e) = outcome {
                                    error!("Scheduled refresh failed: {}", e);
                                }
                            }
                            _ = stop_rx.recv() => {
                                info!("Stopping refresh service during a refresh");
                                break;
                            }
                        }
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping refresh service");
                        break;
                    }
                }
            }
        }));

        info!(
            "Refresh service started for {} tokens every {:?}",
            self.controller.tokens().len(),
            period
        );
        Ok(())
    }

    // Stop the background refresh loop and wait for it to finish
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
            info!("Refresh service stop signal sent");
        }

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Refresh task ended abnormally: {}", e);
            }
        }
    }
}
