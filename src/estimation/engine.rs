//! Revenue engines.
//!
//! Both strategies share the same pipeline once the sales count is known:
//! `sales × price → revenue`, `revenue × commission → benefit`. They differ
//! in the reach basis and in how the fractional sales count is settled.

use super::inputs::{CalculatorInputs, round_half_up};
use super::ComputationResult;

/// A strategy turning the current inputs into a [`ComputationResult`].
pub trait RevenueEngine: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Compute the full result from the inputs.
    fn compute(&self, inputs: &CalculatorInputs) -> ComputationResult;
}

/// Feed-based estimate, recomputed on every change.
///
/// Reach is `followers × engagement`, fractional sales are floored.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveEngine;

impl RevenueEngine for LiveEngine {
    fn name(&self) -> &'static str {
        "live"
    }

    fn compute(&self, inputs: &CalculatorInputs) -> ComputationResult {
        let engaged_users = inputs.profile.engaged_users();
        let sales = (engaged_users * (inputs.offer.conversion_rate_percent / 100.0)).floor();
        settle(sales, inputs)
    }
}

/// Reach-based estimate, computed only on request.
///
/// Uses the independently held active reach, rounds to the nearest sale and
/// clamps at zero so a negative reach never produces negative sales.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatedEngine;

impl RevenueEngine for GatedEngine {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn compute(&self, inputs: &CalculatorInputs) -> ComputationResult {
        let raw = inputs.reach.basis() * (inputs.offer.conversion_rate_percent / 100.0);
        let sales = round_half_up(raw).max(0.0);
        settle(sales, inputs)
    }
}

fn settle(sales: f64, inputs: &CalculatorInputs) -> ComputationResult {
    // Saturating cast: NaN becomes 0, negatives clamp to 0.
    let sales_count = sales as u64;
    let total_revenue = sales_count as f64 * inputs.offer.product_price;
    let benefit = total_revenue * (inputs.offer.commission_rate_percent / 100.0);

    ComputationResult {
        sales_count,
        total_revenue,
        benefit,
    }
}
