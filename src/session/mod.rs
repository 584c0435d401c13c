//! Calculator sessions.
//!
//! A session owns the inputs and the last result and decides when the
//! engine runs:
//!
//! ```text
//! ┌──────────────┬──────────────────────────┬──────────────────────────────┐
//! │ Variant      │ Engine runs              │ Result shown                 │
//! ├──────────────┼──────────────────────────┼──────────────────────────────┤
//! │ LiveSession  │ on every input change    │ always                       │
//! │ GatedSession │ after `calc` + a delay   │ only while nothing changed   │
//! └──────────────┴──────────────────────────┴──────────────────────────────┘
//! ```

mod gated;
mod live;

pub use gated::{GatedSession, PendingCalculation, SnapshotPolicy, TriggerConfig, TriggerOutcome};
pub use live::LiveSession;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::{CalculatorConfig, Variant};
use crate::error::Result;
use crate::estimation::{CalculatorInputs, ComputationResult, InputField};

/// Where a session is in its calculate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Result does not reflect the current inputs.
    Idle,
    /// A delayed calculation is pending.
    Computing,
    /// Result reflects the current inputs.
    Ready,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::Computing => "computing",
            Phase::Ready => "ready",
        };
        f.write_str(label)
    }
}

/// Result of a finished calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationOutcome {
    pub result: ComputationResult,
    /// Inputs the engine actually saw.
    pub inputs: CalculatorInputs,
    /// Inputs changed while the calculation was pending and the result was
    /// computed from the older values.
    pub stale: bool,
}

/// Point-in-time copy of a session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub variant: Variant,
    pub inputs: CalculatorInputs,
    pub result: ComputationResult,
    pub phase: Phase,
}

impl SessionView {
    /// Whether the result reflects the current inputs.
    pub fn is_valid(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// The result, if it may be shown.
    pub fn visible_result(&self) -> Option<ComputationResult> {
        self.is_valid().then_some(self.result)
    }
}

/// Operations shared by both calculator variants.
///
/// Operations that only exist in one variant return
/// [`SessionError::Unsupported`](crate::error::SessionError::Unsupported)
/// in the other.
#[async_trait]
pub trait CalculatorSession: Send + Sync {
    fn variant(&self) -> Variant;

    /// Set a field from raw text.
    async fn set_field(&self, field: InputField, raw: &str) -> Result<()>;

    /// Request a calculation without waiting for it.
    ///
    /// `Ok(None)` means one is already pending and the request was ignored.
    async fn calculate(&self) -> Result<Option<PendingCalculation>>;

    /// Copy the feed-derived reach into the active reach.
    async fn sync_reach(&self) -> Result<f64>;

    /// Zero the result and start over.
    async fn reset(&self) -> Result<()>;

    /// Abort a pending calculation. Returns whether one was pending.
    async fn cancel(&self) -> Result<bool>;

    async fn view(&self) -> SessionView;
}

/// Compose the session selected by the configuration.
pub fn build_session(config: &CalculatorConfig) -> Arc<dyn CalculatorSession> {
    let inputs = config.initial_inputs();
    match config.variant {
        Variant::Live => Arc::new(LiveSession::new(inputs)),
        Variant::Gated => Arc::new(GatedSession::new(config.trigger.clone(), inputs)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_build_session_selects_variant() {
        let live = build_session(&CalculatorConfig::default().with_variant(Variant::Live));
        assert_eq!(live.variant(), Variant::Live);
        assert!(live.view().await.is_valid());

        let gated = build_session(&CalculatorConfig::default().with_delay(Duration::ZERO));
        assert_eq!(gated.variant(), Variant::Gated);
        assert!(!gated.view().await.is_valid());
    }

    #[tokio::test]
    async fn test_build_session_applies_commission() {
        let session = build_session(
            &CalculatorConfig::default()
                .with_variant(Variant::Live)
                .with_commission_rate(25.0)
                .unwrap(),
        );
        let view = session.view().await;
        assert_eq!(view.inputs.offer.commission_rate_percent, 25.0);
        assert_eq!(view.result.benefit, 6_500.0);
    }

    #[test]
    fn test_view_gates_result_on_phase() {
        let result = ComputationResult {
            sales_count: 9,
            total_revenue: 4_500.0,
            benefit: 2_250.0,
        };
        let mut view = SessionView {
            variant: Variant::Gated,
            inputs: CalculatorInputs::gated_defaults(),
            result,
            phase: Phase::Idle,
        };
        assert_eq!(view.visible_result(), None);

        view.phase = Phase::Computing;
        assert_eq!(view.visible_result(), None);

        view.phase = Phase::Ready;
        assert_eq!(view.visible_result(), Some(result));
    }

    #[test]
    fn test_view_serializes_variant_by_name() {
        let view = SessionView {
            variant: Variant::Live,
            inputs: CalculatorInputs::live_defaults(),
            result: ComputationResult::default(),
            phase: Phase::Ready,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["variant"], "live");
        assert_eq!(json["phase"], "ready");
    }
}
