//! Calculator configuration.
//!
//! Values are fixed for the lifetime of a session. The binary fills them
//! from command-line flags and `CREATOR_POTENTIAL_*` environment variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::ConfigError;
use crate::estimation::{CalculatorInputs, DEFAULT_COMMISSION_RATE};
use crate::format::CurrencyFormat;
use crate::links::Platform;
use crate::session::{SnapshotPolicy, TriggerConfig};

/// Which calculator is composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Feed-based estimate recomputed on every change, priced in euros.
    Live,
    /// Reach-based estimate computed on request after a short delay,
    /// priced in dollars.
    #[default]
    Gated,
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Live => "live",
            Variant::Gated => "gated",
        }
    }

    /// Currency each variant reports in. Not configurable.
    pub fn currency(&self) -> CurrencyFormat {
        match self {
            Variant::Live => CurrencyFormat::es_es_eur(),
            Variant::Gated => CurrencyFormat::en_us_usd(),
        }
    }

    /// Inputs a fresh session starts from.
    pub fn default_inputs(&self) -> CalculatorInputs {
        match self {
            Variant::Live => CalculatorInputs::live_defaults(),
            Variant::Gated => CalculatorInputs::gated_defaults(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "v1" => Ok(Variant::Live),
            "gated" | "v2" => Ok(Variant::Gated),
            other => Err(ConfigError::InvalidValue {
                key: "variant",
                value: other.to_string(),
                expected: "live, gated",
            }),
        }
    }
}

fn check_commission_rate(percent: f64) -> Result<f64, ConfigError> {
    if (0.0..=100.0).contains(&percent) {
        Ok(percent)
    } else {
        Err(ConfigError::OutOfRange {
            key: "commission",
            value: percent,
            min: 0.0,
            max: 100.0,
        })
    }
}

/// Parse a commission percentage from a flag or environment value.
pub fn parse_commission_rate(raw: &str) -> Result<f64, ConfigError> {
    let percent = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::NotANumber {
            key: "commission",
            value: raw.to_string(),
        })?;
    check_commission_rate(percent)
}

/// Configuration for a calculator session.
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    pub variant: Variant,
    /// Commission applied to revenue. Not editable once the session runs.
    pub commission_rate_percent: f64,
    /// Delay and snapshot rules of the gated calculator.
    pub trigger: TriggerConfig,
    /// Network used for profile links.
    pub platform: Platform,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            commission_rate_percent: DEFAULT_COMMISSION_RATE,
            trigger: TriggerConfig::default(),
            platform: Platform::default(),
        }
    }
}

impl CalculatorConfig {
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the commission, which must be a finite percentage in `[0, 100]`.
    pub fn with_commission_rate(mut self, percent: f64) -> Result<Self, ConfigError> {
        self.commission_rate_percent = check_commission_rate(percent)?;
        Ok(self)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.trigger.delay = delay;
        self
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotPolicy) -> Self {
        self.trigger.snapshot = snapshot;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Starting inputs for the configured variant and commission.
    pub fn initial_inputs(&self) -> CalculatorInputs {
        self.variant
            .default_inputs()
            .with_commission_rate(self.commission_rate_percent)
    }

    pub fn currency(&self) -> CurrencyFormat {
        self.variant.currency()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.variant, Variant::Gated);
        assert_eq!(config.commission_rate_percent, 50.0);
        assert_eq!(config.trigger.delay, Duration::from_millis(600));
        assert_eq!(config.trigger.snapshot, SnapshotPolicy::AtTrigger);
        assert_eq!(config.platform, Platform::Instagram);
    }

    #[test]
    fn test_config_builders() {
        let config = CalculatorConfig::default()
            .with_variant(Variant::Live)
            .with_commission_rate(30.0)
            .unwrap()
            .with_delay(Duration::ZERO)
            .with_snapshot(SnapshotPolicy::AtCompletion)
            .with_platform(Platform::TikTok);

        assert_eq!(config.variant, Variant::Live);
        assert_eq!(config.trigger.delay, Duration::ZERO);
        assert_eq!(config.trigger.snapshot, SnapshotPolicy::AtCompletion);
        assert_eq!(config.platform, Platform::TikTok);
        assert_eq!(config.initial_inputs().offer.commission_rate_percent, 30.0);
        assert_eq!(config.currency(), CurrencyFormat::es_es_eur());
    }

    #[test]
    fn test_commission_rate_bounds() {
        for percent in [0.0, 50.0, 100.0] {
            let config = CalculatorConfig::default()
                .with_commission_rate(percent)
                .unwrap();
            assert_eq!(config.commission_rate_percent, percent);
        }

        for percent in [150.0, -10.0, 100.01, f64::NAN, f64::INFINITY] {
            let err = CalculatorConfig::default()
                .with_commission_rate(percent)
                .unwrap_err();
            assert!(matches!(err, ConfigError::OutOfRange { key: "commission", .. }));
        }
    }

    #[test]
    fn test_parse_commission_rate() {
        assert_eq!(parse_commission_rate(" 25 ").unwrap(), 25.0);
        assert!(matches!(
            parse_commission_rate("150"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_commission_rate("half"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_commission_rate("nan"),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("LIVE".parse::<Variant>().unwrap(), Variant::Live);
        assert_eq!("v2".parse::<Variant>().unwrap(), Variant::Gated);
        let err = "turbo".parse::<Variant>().unwrap_err();
        assert!(err.to_string().contains("turbo"));
    }

    #[test]
    fn test_variant_currency() {
        assert_eq!(Variant::Live.currency().currency(), "EUR");
        assert_eq!(Variant::Gated.currency().currency(), "USD");
    }
}
