//! Creator potential: estimate what an Instagram creator could earn selling
//! a product to their audience.
//!
//! Two calculators share one pipeline (reach → sales → revenue → benefit):
//! - [`session::LiveSession`] recomputes on every input change,
//! - [`session::GatedSession`] computes on request after a short delay and
//!   invalidates its result whenever an input changes.

pub mod cli;
pub mod config;
pub mod error;
pub mod estimation;
pub mod format;
pub mod links;
pub mod session;

pub use config::{CalculatorConfig, Variant};
pub use error::{ConfigError, LinkError, SessionError};
pub use estimation::{CalculatorInputs, ComputationResult, GatedEngine, LiveEngine, RevenueEngine};
pub use format::CurrencyFormat;
pub use session::{CalculatorSession, GatedSession, LiveSession, Phase, build_session};
