//! Live calculator: every change recomputes the result on the spot.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CalculatorSession, PendingCalculation, Phase, SessionView};
use crate::config::Variant;
use crate::error::{Result, SessionError};
use crate::estimation::{
    CalculatorInputs, ComputationResult, InputField, LiveEngine, RevenueEngine,
};

struct LiveState {
    inputs: CalculatorInputs,
    result: ComputationResult,
}

/// Feed-based calculator with no stale state.
pub struct LiveSession {
    state: RwLock<LiveState>,
    engine: LiveEngine,
}

impl LiveSession {
    pub fn new(inputs: CalculatorInputs) -> Self {
        let engine = LiveEngine;
        let result = engine.compute(&inputs);
        Self {
            state: RwLock::new(LiveState { inputs, result }),
            engine,
        }
    }

    async fn update(&self, apply: impl FnOnce(&mut CalculatorInputs)) -> ComputationResult {
        let mut state = self.state.write().await;
        apply(&mut state.inputs);
        state.result = self.engine.compute(&state.inputs);
        tracing::debug!(
            sales = state.result.sales_count,
            revenue = state.result.total_revenue,
            "Recomputed live estimate"
        );
        state.result
    }

    pub async fn set_username(&self, username: &str) {
        // The name plays no part in the estimate.
        self.state.write().await.inputs.set_username(username);
    }

    pub async fn set_followers(&self, followers: f64) -> ComputationResult {
        self.update(|inputs| inputs.set_followers(followers)).await
    }

    pub async fn set_engagement_rate(&self, percent: f64) -> ComputationResult {
        self.update(|inputs| inputs.set_engagement_rate(percent)).await
    }

    pub async fn set_product_price(&self, price: f64) -> ComputationResult {
        self.update(|inputs| inputs.set_product_price(price)).await
    }

    pub async fn set_conversion_rate(&self, percent: f64) -> ComputationResult {
        self.update(|inputs| inputs.set_conversion_rate(percent)).await
    }

    pub async fn result(&self) -> ComputationResult {
        self.state.read().await.result
    }

    fn unsupported(operation: &'static str) -> SessionError {
        SessionError::Unsupported {
            variant: Variant::Live.name(),
            operation,
        }
    }
}

#[async_trait]
impl CalculatorSession for LiveSession {
    fn variant(&self) -> Variant {
        Variant::Live
    }

    async fn set_field(&self, field: InputField, raw: &str) -> Result<()> {
        match field {
            InputField::Username => self.set_username(raw).await,
            InputField::ActiveReach => return Err(Self::unsupported("reach")),
            _ => {
                self.update(|inputs| inputs.apply(field, raw)).await;
            }
        }
        Ok(())
    }

    async fn calculate(&self) -> Result<Option<PendingCalculation>> {
        Err(Self::unsupported("calc"))
    }

    async fn sync_reach(&self) -> Result<f64> {
        Err(Self::unsupported("sync"))
    }

    async fn reset(&self) -> Result<()> {
        Err(Self::unsupported("reset"))
    }

    async fn cancel(&self) -> Result<bool> {
        Err(Self::unsupported("cancel"))
    }

    async fn view(&self) -> SessionView {
        let state = self.state.read().await;
        SessionView {
            variant: Variant::Live,
            inputs: state.inputs.clone(),
            result: state.result,
            phase: Phase::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_starts_with_computed_defaults() {
        let session = LiveSession::new(CalculatorInputs::live_defaults());
        assert_eq!(
            session.result().await,
            ComputationResult {
                sales_count: 52,
                total_revenue: 26_000.0,
                benefit: 13_000.0,
            }
        );
    }

    #[tokio::test]
    async fn test_every_setter_recomputes() {
        let session = LiveSession::new(CalculatorInputs::live_defaults());

        assert_eq!(session.set_followers(40_000.0).await.sales_count, 104);
        assert_eq!(session.set_engagement_rate(1.3).await.sales_count, 52);
        assert_eq!(session.set_conversion_rate(5.0).await.sales_count, 26);

        let result = session.set_product_price(100.0).await;
        assert_eq!(result.total_revenue, 2_600.0);
        assert_eq!(result.benefit, 1_300.0);
        assert_eq!(session.result().await, result);
    }

    #[tokio::test]
    async fn test_set_field_from_text() {
        let session = LiveSession::new(CalculatorInputs::live_defaults());

        session.set_field(InputField::Followers, "").await.unwrap();
        assert_eq!(session.result().await.sales_count, 0);

        session.set_field(InputField::Followers, "20000").await.unwrap();
        session.set_field(InputField::ProductPrice, "n/a").await.unwrap();
        let view = session.view().await;
        assert_eq!(view.result.sales_count, 52);
        assert!(view.result.total_revenue.is_nan());
        assert!(view.is_valid());
    }

    #[tokio::test]
    async fn test_username_does_not_change_result() {
        let session = LiveSession::new(CalculatorInputs::live_defaults());
        let before = session.result().await;
        session.set_field(InputField::Username, "@someone").await.unwrap();

        let view = session.view().await;
        assert_eq!(view.inputs.profile.username, "@someone");
        assert_eq!(view.result, before);
    }

    #[test]
    fn test_gated_operations_are_unsupported() {
        tokio_test::block_on(async {
            let session = LiveSession::new(CalculatorInputs::live_defaults());
            assert!(matches!(
                session.set_field(InputField::ActiveReach, "470").await,
                Err(SessionError::Unsupported { operation: "reach", .. })
            ));
            assert!(session.calculate().await.is_err());
            assert!(session.sync_reach().await.is_err());
            assert!(session.reset().await.is_err());
            assert!(session.cancel().await.is_err());
        });
    }
}
