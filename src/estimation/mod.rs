//! Revenue estimation for creator offers.
//!
//! The pipeline is always the same:
//! - reach basis (feed engagement or active reach)
//! - sales count
//! - total revenue
//! - benefit after commission

mod engine;
mod guide;
mod inputs;

pub use engine::{GatedEngine, LiveEngine, RevenueEngine};
pub use guide::{ConversionTier, EngagementTier};
pub use inputs::{
    CalculatorInputs, CreatorProfile, DEFAULT_COMMISSION_RATE, InputField, OfferParameters,
    ReachEstimate, coerce_number, round_half_up,
};

use serde::{Deserialize, Serialize};

/// Derived figures, always recomputed together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    /// Estimated number of sales.
    pub sales_count: u64,
    /// Sales count times product price.
    pub total_revenue: f64,
    /// Creator's share of the revenue.
    pub benefit: f64,
}
