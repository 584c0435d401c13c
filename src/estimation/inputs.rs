//! Raw user-entered metrics.
//!
//! Every field is independently settable. Numbers are kept as `f64` because
//! the values come from free-form input fields that are never validated;
//! see [`coerce_number`] for how text becomes a number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Commission share applied to total revenue unless configured otherwise.
pub const DEFAULT_COMMISSION_RATE: f64 = 50.0;

/// Creator identity and audience size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    pub username: String,
    pub followers: f64,
    pub engagement_rate_percent: f64,
}

impl Default for CreatorProfile {
    fn default() -> Self {
        Self {
            username: "Raúl_Trainer".to_string(),
            followers: 20_000.0,
            engagement_rate_percent: 2.6,
        }
    }
}

impl CreatorProfile {
    /// Followers expected to interact with a feed post.
    pub fn engaged_users(&self) -> f64 {
        self.followers * (self.engagement_rate_percent / 100.0)
    }
}

/// The audience the creator believes actually sees the offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReachEstimate {
    /// `None` until the user types a value or syncs it from the feed.
    pub active_reach: Option<f64>,
}

impl ReachEstimate {
    /// Reach used by the engine; unset counts as nobody.
    pub fn basis(&self) -> f64 {
        self.active_reach.unwrap_or(0.0)
    }
}

/// What is being sold and on which terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferParameters {
    pub product_price: f64,
    pub conversion_rate_percent: f64,
    pub commission_rate_percent: f64,
}

impl Default for OfferParameters {
    fn default() -> Self {
        Self {
            product_price: 500.0,
            conversion_rate_percent: 10.0,
            commission_rate_percent: DEFAULT_COMMISSION_RATE,
        }
    }
}

/// Editable inputs, addressed by name from the command line and the REPL.
///
/// The commission rate is deliberately absent: it is fixed per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputField {
    Username,
    Followers,
    EngagementRate,
    ActiveReach,
    ProductPrice,
    ConversionRate,
}

impl InputField {
    pub const ALL: [InputField; 6] = [
        InputField::Username,
        InputField::Followers,
        InputField::EngagementRate,
        InputField::ActiveReach,
        InputField::ProductPrice,
        InputField::ConversionRate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InputField::Username => "username",
            InputField::Followers => "followers",
            InputField::EngagementRate => "engagement",
            InputField::ActiveReach => "reach",
            InputField::ProductPrice => "price",
            InputField::ConversionRate => "conversion",
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputField {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "username" | "user" | "name" => Ok(InputField::Username),
            "followers" => Ok(InputField::Followers),
            "engagement" | "interaction" => Ok(InputField::EngagementRate),
            "reach" | "active-reach" | "active_reach" => Ok(InputField::ActiveReach),
            "price" | "product-price" => Ok(InputField::ProductPrice),
            "conversion" => Ok(InputField::ConversionRate),
            other => Err(SessionError::UnknownField(other.to_string())),
        }
    }
}

/// Injectable input state holder shared by both calculator variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInputs {
    pub profile: CreatorProfile,
    pub reach: ReachEstimate,
    pub offer: OfferParameters,
}

impl CalculatorInputs {
    /// Defaults of the live (first) calculator.
    pub fn live_defaults() -> Self {
        Self::default()
    }

    /// Defaults of the trigger-gated calculator: reach unset, lower conversion.
    pub fn gated_defaults() -> Self {
        Self {
            offer: OfferParameters {
                conversion_rate_percent: 2.0,
                ..OfferParameters::default()
            },
            ..Self::default()
        }
    }

    pub fn with_commission_rate(mut self, percent: f64) -> Self {
        self.offer.commission_rate_percent = percent;
        self
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.profile.username = username.into();
    }

    pub fn set_followers(&mut self, followers: f64) {
        self.profile.followers = followers;
    }

    pub fn set_engagement_rate(&mut self, percent: f64) {
        self.profile.engagement_rate_percent = percent;
    }

    pub fn set_active_reach(&mut self, reach: f64) {
        self.reach.active_reach = Some(reach);
    }

    pub fn set_product_price(&mut self, price: f64) {
        self.offer.product_price = price;
    }

    pub fn set_conversion_rate(&mut self, percent: f64) {
        self.offer.conversion_rate_percent = percent;
    }

    /// Apply raw text to a field, coercing numbers the way a form field would.
    pub fn apply(&mut self, field: InputField, raw: &str) {
        match field {
            InputField::Username => self.set_username(raw),
            InputField::Followers => self.set_followers(coerce_number(raw)),
            InputField::EngagementRate => self.set_engagement_rate(coerce_number(raw)),
            InputField::ActiveReach => self.set_active_reach(coerce_number(raw)),
            InputField::ProductPrice => self.set_product_price(coerce_number(raw)),
            InputField::ConversionRate => self.set_conversion_rate(coerce_number(raw)),
        }
    }
}

/// Convert free-form text to a number without ever failing.
///
/// Blank text is `0`, anything unparsable is `NaN`.
///
/// Only decimal notation is accepted. Spellings such as `inf` or `nan`
/// that `f64::from_str` understands are not numbers here.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !decimal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Round half up, matching the rounding used for sales and reach figures.
///
/// `f64::round` rounds halves away from zero, which differs for negative
/// halves (`-2.5` must become `-2`).
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("20000"), 20_000.0);
        assert_eq!(coerce_number(" 2.6 "), 2.6);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number("-470"), -470.0);
        assert!(coerce_number("abc").is_nan());
        assert!(coerce_number("12abc").is_nan());
        assert_eq!(coerce_number("1e3"), 1_000.0);
    }

    #[test]
    fn test_coerce_number_rejects_named_values() {
        for raw in ["inf", "-inf", "infinity", "Infinity", "nan", "NaN"] {
            assert!(coerce_number(raw).is_nan(), "{raw}");
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(9.4), 9.0);
        assert_eq!(round_half_up(9.5), 10.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert!(round_half_up(f64::NAN).is_nan());
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("Followers".parse::<InputField>().unwrap(), InputField::Followers);
        assert_eq!("reach".parse::<InputField>().unwrap(), InputField::ActiveReach);
        assert!(matches!(
            "commission".parse::<InputField>(),
            Err(SessionError::UnknownField(_))
        ));
        for field in InputField::ALL {
            assert_eq!(field.name().parse::<InputField>().unwrap(), field);
        }
    }

    #[test]
    fn test_apply_coerces_text() {
        let mut inputs = CalculatorInputs::default();
        inputs.apply(InputField::Followers, "");
        inputs.apply(InputField::ProductPrice, "lots");
        inputs.apply(InputField::ActiveReach, "470");

        assert_eq!(inputs.profile.followers, 0.0);
        assert!(inputs.offer.product_price.is_nan());
        assert_eq!(inputs.reach.active_reach, Some(470.0));
    }

    #[test]
    fn test_defaults() {
        let live = CalculatorInputs::live_defaults();
        assert_eq!(live.profile.username, "Raúl_Trainer");
        assert_eq!(live.offer.conversion_rate_percent, 10.0);
        assert_eq!(live.offer.commission_rate_percent, DEFAULT_COMMISSION_RATE);

        let gated = CalculatorInputs::gated_defaults();
        assert_eq!(gated.offer.conversion_rate_percent, 2.0);
        assert_eq!(gated.reach.active_reach, None);
        assert_eq!(gated.reach.basis(), 0.0);
    }
}
