//! Trigger-gated calculator.
//!
//! The result is only computed on request, after an artificial processing
//! delay. Any input change invalidates the shown result without erasing it.
//!
//! ```text
//!            trigger()                delay elapsed
//!   Idle ───────────────▶ Computing ───────────────▶ Ready
//!    ▲                      │                          │
//!    │  cancel() / reset()  │     input change         │
//!    └──────────────────────┴──────────── / reset() ◀──┘
//! ```
//!
//! At most one calculation is in flight: `trigger()` is ignored while one
//! is pending, and each pending calculation carries a generation number so
//! a cancelled task can never apply its result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{RwLock, oneshot, watch};
use tokio::task::JoinHandle;

use super::{CalculationOutcome, CalculatorSession, Phase, SessionView};
use crate::config::Variant;
use crate::error::{ConfigError, Result};
use crate::estimation::{
    CalculatorInputs, ComputationResult, GatedEngine, InputField, RevenueEngine, round_half_up,
};

/// Which inputs a delayed calculation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPolicy {
    /// Inputs as they were when the calculation was requested.
    #[default]
    AtTrigger,
    /// Inputs as they are when the delay has elapsed.
    AtCompletion,
}

impl std::str::FromStr for SnapshotPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "at-trigger" | "trigger" => Ok(SnapshotPolicy::AtTrigger),
            "at-completion" | "completion" | "latest" => Ok(SnapshotPolicy::AtCompletion),
            other => Err(ConfigError::InvalidValue {
                key: "snapshot",
                value: other.to_string(),
                expected: "at-trigger, at-completion",
            }),
        }
    }
}

/// Timing rules of the gated calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Artificial processing delay before the engine runs.
    pub delay: Duration,
    pub snapshot: SnapshotPolicy,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(600),
            snapshot: SnapshotPolicy::AtTrigger,
        }
    }
}

impl TriggerConfig {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotPolicy) -> Self {
        self.snapshot = snapshot;
        self
    }
}

/// Answer to a calculation request.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// A delayed calculation was scheduled.
    Scheduled(PendingCalculation),
    /// A calculation is already pending; nothing was scheduled.
    Ignored,
}

/// Handle to a scheduled calculation.
#[derive(Debug)]
pub struct PendingCalculation {
    generation: u64,
    handle: JoinHandle<Option<CalculationOutcome>>,
}

impl PendingCalculation {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the calculation. `None` if it was cancelled.
    pub async fn wait(self) -> Option<CalculationOutcome> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(generation = self.generation, "Calculation task failed: {}", e);
                None
            }
        }
    }
}

struct InFlight {
    generation: u64,
    /// Captured inputs under [`SnapshotPolicy::AtTrigger`].
    snapshot: Option<CalculatorInputs>,
    inputs_changed: bool,
    /// Dropping the sender cancels the delayed task.
    _cancel: oneshot::Sender<()>,
}

struct GatedState {
    inputs: CalculatorInputs,
    result: ComputationResult,
    phase: Phase,
    generation: u64,
    in_flight: Option<InFlight>,
}

struct Shared {
    state: RwLock<GatedState>,
    engine: Box<dyn RevenueEngine>,
    phase_tx: watch::Sender<Phase>,
}

impl Shared {
    fn set_phase(&self, state: &mut GatedState, phase: Phase) {
        if state.phase != phase {
            tracing::debug!(from = %state.phase, to = %phase, "Phase change");
        }
        state.phase = phase;
        self.phase_tx.send_replace(phase);
    }

    async fn complete(&self, generation: u64) -> Option<CalculationOutcome> {
        let mut state = self.state.write().await;
        let in_flight = state.in_flight.take_if(|f| f.generation == generation)?;

        let stale = in_flight.inputs_changed && in_flight.snapshot.is_some();
        let inputs = in_flight
            .snapshot
            .unwrap_or_else(|| state.inputs.clone());
        let result = self.engine.compute(&inputs);

        state.result = result;
        self.set_phase(&mut state, Phase::Ready);

        if stale {
            tracing::warn!(
                generation,
                "Inputs changed while calculating; result reflects the values at request time"
            );
        }
        tracing::info!(
            engine = self.engine.name(),
            sales = result.sales_count,
            revenue = result.total_revenue,
            "Results ready"
        );

        Some(CalculationOutcome {
            result,
            inputs,
            stale,
        })
    }
}

/// Reach-based calculator that computes only when asked.
pub struct GatedSession {
    shared: Arc<Shared>,
    config: TriggerConfig,
}

impl GatedSession {
    pub fn new(config: TriggerConfig, inputs: CalculatorInputs) -> Self {
        Self::with_engine(config, inputs, Box::new(GatedEngine))
    }

    /// Use a custom engine in place of [`GatedEngine`].
    pub fn with_engine(
        config: TriggerConfig,
        inputs: CalculatorInputs,
        engine: Box<dyn RevenueEngine>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Idle);
        let state = GatedState {
            inputs,
            result: ComputationResult::default(),
            phase: Phase::Idle,
            generation: 0,
            in_flight: None,
        };
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                engine,
                phase_tx,
            }),
            config,
        }
    }

    /// Watch phase changes, e.g. to bring results into view once ready.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.shared.phase_tx.subscribe()
    }

    /// Request a calculation.
    ///
    /// The engine runs once the configured delay has elapsed. Requests made
    /// while one is pending are ignored.
    pub async fn trigger(&self) -> TriggerOutcome {
        let mut state = self.shared.state.write().await;
        if let Some(in_flight) = &state.in_flight {
            tracing::debug!(
                generation = in_flight.generation,
                "Calculation already pending, ignoring trigger"
            );
            return TriggerOutcome::Ignored;
        }

        state.generation += 1;
        let generation = state.generation;
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let snapshot = match self.config.snapshot {
            SnapshotPolicy::AtTrigger => Some(state.inputs.clone()),
            SnapshotPolicy::AtCompletion => None,
        };
        state.in_flight = Some(InFlight {
            generation,
            snapshot,
            inputs_changed: false,
            _cancel: cancel_tx,
        });
        self.shared.set_phase(&mut state, Phase::Computing);

        tracing::info!(generation, delay = ?self.config.delay, "Calculation scheduled");

        let shared = Arc::clone(&self.shared);
        let delay = self.config.delay;
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => shared.complete(generation).await,
                _ = cancel_rx => {
                    tracing::debug!(generation, "Calculation cancelled");
                    None
                }
            }
        });

        TriggerOutcome::Scheduled(PendingCalculation { generation, handle })
    }

    /// Abort the pending calculation, if any.
    pub async fn cancel(&self) -> bool {
        let mut state = self.shared.state.write().await;
        let Some(in_flight) = state.in_flight.take() else {
            return false;
        };
        tracing::info!(generation = in_flight.generation, "Cancelling calculation");
        self.shared.set_phase(&mut state, Phase::Idle);
        true
    }

    /// Zero the result and return to `Idle`, dropping any pending calculation.
    pub async fn reset(&self) {
        let mut state = self.shared.state.write().await;
        state.in_flight = None;
        state.result = ComputationResult::default();
        self.shared.set_phase(&mut state, Phase::Idle);
        tracing::info!("Calculator reset");
    }

    async fn mutate<T>(&self, apply: impl FnOnce(&mut CalculatorInputs) -> T) -> T {
        let mut state = self.shared.state.write().await;
        let value = apply(&mut state.inputs);
        let phase = state.phase;
        match phase {
            Phase::Ready => self.shared.set_phase(&mut state, Phase::Idle),
            Phase::Computing => {
                if let Some(in_flight) = state.in_flight.as_mut() {
                    in_flight.inputs_changed = true;
                }
            }
            Phase::Idle => {}
        }
        value
    }

    pub async fn set_username(&self, username: &str) {
        self.mutate(|inputs| inputs.set_username(username)).await
    }

    pub async fn set_followers(&self, followers: f64) {
        self.mutate(|inputs| inputs.set_followers(followers)).await
    }

    pub async fn set_engagement_rate(&self, percent: f64) {
        self.mutate(|inputs| inputs.set_engagement_rate(percent)).await
    }

    pub async fn set_active_reach(&self, reach: f64) {
        self.mutate(|inputs| inputs.set_active_reach(reach)).await
    }

    pub async fn set_product_price(&self, price: f64) {
        self.mutate(|inputs| inputs.set_product_price(price)).await
    }

    pub async fn set_conversion_rate(&self, percent: f64) {
        self.mutate(|inputs| inputs.set_conversion_rate(percent)).await
    }

    /// Set the active reach to the engaged feed audience, rounded.
    ///
    /// Invalidates the result but does not calculate.
    pub async fn sync_reach_from_feed(&self) -> f64 {
        self.mutate(|inputs| {
            let reach = round_half_up(inputs.profile.engaged_users());
            inputs.set_active_reach(reach);
            reach
        })
        .await
    }

    pub async fn phase(&self) -> Phase {
        self.shared.state.read().await.phase
    }

    pub async fn is_valid(&self) -> bool {
        self.phase().await == Phase::Ready
    }

    /// Last computed figures, whether or not they are still valid.
    pub async fn result(&self) -> ComputationResult {
        self.shared.state.read().await.result
    }

    pub async fn inputs(&self) -> CalculatorInputs {
        self.shared.state.read().await.inputs.clone()
    }
}

#[async_trait]
impl CalculatorSession for GatedSession {
    fn variant(&self) -> Variant {
        Variant::Gated
    }

    async fn set_field(&self, field: InputField, raw: &str) -> Result<()> {
        self.mutate(|inputs| inputs.apply(field, raw)).await;
        Ok(())
    }

    async fn calculate(&self) -> Result<Option<PendingCalculation>> {
        match self.trigger().await {
            TriggerOutcome::Scheduled(pending) => Ok(Some(pending)),
            TriggerOutcome::Ignored => Ok(None),
        }
    }

    async fn sync_reach(&self) -> Result<f64> {
        Ok(self.sync_reach_from_feed().await)
    }

    async fn reset(&self) -> Result<()> {
        GatedSession::reset(self).await;
        Ok(())
    }

    async fn cancel(&self) -> Result<bool> {
        Ok(GatedSession::cancel(self).await)
    }

    async fn view(&self) -> SessionView {
        let state = self.shared.state.read().await;
        SessionView {
            variant: Variant::Gated,
            inputs: state.inputs.clone(),
            result: state.result,
            phase: state.phase,
        }
    }
}
