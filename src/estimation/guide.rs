//! Metric guide: qualitative tiers for engagement and conversion rates.

use std::fmt;

use serde::Serialize;

/// Interaction quality of an audience, as rated by SocialBlade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementTier {
    Low,
    Medium,
    Strong,
    Exceptional,
}

impl EngagementTier {
    pub const ALL: [EngagementTier; 4] = [
        EngagementTier::Low,
        EngagementTier::Medium,
        EngagementTier::Strong,
        EngagementTier::Exceptional,
    ];

    /// Classify an engagement rate in percent. Non-finite rates are `Low`.
    pub fn classify(rate_percent: f64) -> Self {
        match rate_percent {
            r if r >= 5.0 && r.is_finite() => EngagementTier::Exceptional,
            r if r >= 3.0 && r.is_finite() => EngagementTier::Strong,
            r if r >= 1.0 && r.is_finite() => EngagementTier::Medium,
            _ => EngagementTier::Low,
        }
    }

    /// Range shown in the guide.
    pub fn range(&self) -> &'static str {
        match self {
            EngagementTier::Low => "< 1%",
            EngagementTier::Medium => "1-3%",
            EngagementTier::Strong => "3-5%",
            EngagementTier::Exceptional => "5%+",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            EngagementTier::Low => "poor",
            EngagementTier::Medium => "acceptable",
            EngagementTier::Strong => "good",
            EngagementTier::Exceptional => "excellent",
        }
    }
}

impl fmt::Display for EngagementTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EngagementTier::Low => "low",
            EngagementTier::Medium => "medium",
            EngagementTier::Strong => "strong",
            EngagementTier::Exceptional => "exceptional",
        };
        f.write_str(label)
    }
}

/// Buying temperature of an audience, driven by trust and offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionTier {
    Low,
    Medium,
    High,
}

impl ConversionTier {
    pub const ALL: [ConversionTier; 3] =
        [ConversionTier::Low, ConversionTier::Medium, ConversionTier::High];

    /// Classify a conversion rate in percent. Non-finite rates are `Low`.
    pub fn classify(rate_percent: f64) -> Self {
        match rate_percent {
            r if r >= 10.0 && r.is_finite() => ConversionTier::High,
            r if r >= 5.0 && r.is_finite() => ConversionTier::Medium,
            _ => ConversionTier::Low,
        }
    }

    pub fn range(&self) -> &'static str {
        match self {
            ConversionTier::Low => "< 5%",
            ConversionTier::Medium => "5-10%",
            ConversionTier::High => "10%+",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            ConversionTier::Low => "cold",
            ConversionTier::Medium => "warm",
            ConversionTier::High => "hot",
        }
    }
}

impl fmt::Display for ConversionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConversionTier::Low => "low",
            ConversionTier::Medium => "medium",
            ConversionTier::High => "high",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engagement_boundaries() {
        assert_eq!(EngagementTier::classify(0.0), EngagementTier::Low);
        assert_eq!(EngagementTier::classify(0.99), EngagementTier::Low);
        assert_eq!(EngagementTier::classify(1.0), EngagementTier::Medium);
        assert_eq!(EngagementTier::classify(2.6), EngagementTier::Medium);
        assert_eq!(EngagementTier::classify(3.0), EngagementTier::Strong);
        assert_eq!(EngagementTier::classify(4.99), EngagementTier::Strong);
        assert_eq!(EngagementTier::classify(5.0), EngagementTier::Exceptional);
        assert_eq!(EngagementTier::classify(120.0), EngagementTier::Exceptional);
    }

    #[test]
    fn test_conversion_boundaries() {
        assert_eq!(ConversionTier::classify(2.0), ConversionTier::Low);
        assert_eq!(ConversionTier::classify(5.0), ConversionTier::Medium);
        assert_eq!(ConversionTier::classify(9.9), ConversionTier::Medium);
        assert_eq!(ConversionTier::classify(10.0), ConversionTier::High);
    }

    #[test]
    fn test_non_finite_rates_are_lowest_tier() {
        assert_eq!(EngagementTier::classify(f64::NAN), EngagementTier::Low);
        assert_eq!(EngagementTier::classify(f64::INFINITY), EngagementTier::Low);
        assert_eq!(ConversionTier::classify(f64::NAN), ConversionTier::Low);
        assert_eq!(ConversionTier::classify(f64::INFINITY), ConversionTier::Low);
    }
}
