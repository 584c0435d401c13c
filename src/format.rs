//! Locale-specific currency text.

use rust_decimal::prelude::*;

/// Rendered in place of amounts that are not finite numbers.
pub const NON_FINITE_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    /// `$26,000.00`
    Prefix,
    /// `26.000,00 €`, separated by a no-break space.
    Suffix,
}

/// Currency formatting rules for one locale/currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyFormat {
    locale: &'static str,
    currency: &'static str,
    symbol: &'static str,
    decimal_separator: char,
    group_separator: char,
    /// Integer digits that must precede the first group before grouping
    /// kicks in (CLDR `minimumGroupingDigits`).
    min_grouping_digits: usize,
    position: SymbolPosition,
}

impl CurrencyFormat {
    /// Euro in Spanish conventions: `26.000,00 €`.
    pub const fn es_es_eur() -> Self {
        Self {
            locale: "es-ES",
            currency: "EUR",
            symbol: "€",
            decimal_separator: ',',
            group_separator: '.',
            min_grouping_digits: 2,
            position: SymbolPosition::Suffix,
        }
    }

    /// US dollar in US conventions: `$26,000.00`.
    pub const fn en_us_usd() -> Self {
        Self {
            locale: "en-US",
            currency: "USD",
            symbol: "$",
            decimal_separator: '.',
            group_separator: ',',
            min_grouping_digits: 1,
            position: SymbolPosition::Prefix,
        }
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    pub fn currency(&self) -> &'static str {
        self.currency
    }

    /// Format an amount with two fraction digits.
    ///
    /// Halves round away from zero. `NaN`, infinities and amounts too large
    /// for a `Decimal` render as [`NON_FINITE_PLACEHOLDER`].
    pub fn format(&self, value: f64) -> String {
        let Some(amount) = Decimal::from_f64(value).filter(|_| value.is_finite()) else {
            return NON_FINITE_PLACEHOLDER.to_string();
        };
        self.format_decimal(amount)
    }

    /// Format an exact decimal amount.
    pub fn format_decimal(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();

        let digits = format!("{:.2}", rounded.abs());
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
        let number = format!(
            "{}{}{}",
            self.group(integer),
            self.decimal_separator,
            fraction
        );

        let sign = if negative { "-" } else { "" };
        match self.position {
            SymbolPosition::Prefix => format!("{sign}{}{number}", self.symbol),
            SymbolPosition::Suffix => format!("{sign}{number}\u{a0}{}", self.symbol),
        }
    }

    fn group(&self, integer: &str) -> String {
        if integer.len() < 3 + self.min_grouping_digits {
            return integer.to_string();
        }

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_es_es_eur() {
        let eur = CurrencyFormat::es_es_eur();
        assert_eq!(eur.format(26_000.0), "26.000,00\u{a0}€");
        assert_eq!(eur.format(13_000.0), "13.000,00\u{a0}€");
        assert_eq!(eur.format(2_250.0), "2250,00\u{a0}€");
        assert_eq!(eur.format(0.0), "0,00\u{a0}€");
        assert_eq!(eur.format(1_234_567.891), "1.234.567,89\u{a0}€");
        assert_eq!(eur.format(-5.0), "-5,00\u{a0}€");
    }

    #[test]
    fn test_en_us_usd() {
        let usd = CurrencyFormat::en_us_usd();
        assert_eq!(usd.format(4_500.0), "$4,500.00");
        assert_eq!(usd.format(2_250.0), "$2,250.00");
        assert_eq!(usd.format(999.0), "$999.00");
        assert_eq!(usd.format(26_000.5), "$26,000.50");
        assert_eq!(usd.format(-5.0), "-$5.00");
        assert_eq!(usd.format(1_000_000.0), "$1,000,000.00");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let usd = CurrencyFormat::en_us_usd();
        assert_eq!(usd.format_decimal(dec!(0.125)), "$0.13");
        assert_eq!(usd.format_decimal(dec!(-0.125)), "-$0.13");
        assert_eq!(usd.format_decimal(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_non_finite_uses_placeholder() {
        for format in [CurrencyFormat::es_es_eur(), CurrencyFormat::en_us_usd()] {
            assert_eq!(format.format(f64::NAN), NON_FINITE_PLACEHOLDER);
            assert_eq!(format.format(f64::INFINITY), NON_FINITE_PLACEHOLDER);
            assert_eq!(format.format(f64::NEG_INFINITY), NON_FINITE_PLACEHOLDER);
            assert_eq!(format.format(1e40), NON_FINITE_PLACEHOLDER);
        }
    }

    #[test]
    fn test_identity() {
        assert_eq!(CurrencyFormat::es_es_eur().locale(), "es-ES");
        assert_eq!(CurrencyFormat::es_es_eur().currency(), "EUR");
        assert_eq!(CurrencyFormat::en_us_usd().locale(), "en-US");
        assert_eq!(CurrencyFormat::en_us_usd().currency(), "USD");
    }
}
