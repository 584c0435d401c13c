//! Text reports for sessions and the metric guide.

use std::fmt::Write;

use crossterm::style::Stylize;

use crate::config::Variant;
use crate::estimation::{ConversionTier, EngagementTier};
use crate::format::{CurrencyFormat, NON_FINITE_PLACEHOLDER};
use crate::session::{CalculationOutcome, Phase, SessionView};

const LABEL_WIDTH: usize = 16;

fn number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        NON_FINITE_PLACEHOLDER.to_string()
    }
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {:width$} {}", label, value, width = LABEL_WIDTH);
}

/// Full report: inputs, then results if they may be shown.
pub fn render_view(view: &SessionView, currency: CurrencyFormat) -> String {
    let mut out = String::new();
    let profile = &view.inputs.profile;
    let offer = &view.inputs.offer;
    let gated = view.variant == Variant::Gated;

    let _ = writeln!(out, "{}", "Creator".magenta().bold());
    row(&mut out, "username", &profile.username);
    row(&mut out, "followers", number(profile.followers));
    let engagement = EngagementTier::classify(profile.engagement_rate_percent);
    row(
        &mut out,
        "engagement",
        format!(
            "{}%  ({}: {})",
            number(profile.engagement_rate_percent),
            engagement,
            engagement.verdict()
        ),
    );
    if gated {
        let reach = match view.inputs.reach.active_reach {
            Some(reach) => number(reach),
            None => "not set (use `sync` or `set reach`)".to_string(),
        };
        row(&mut out, "active reach", reach);
    }

    let _ = writeln!(out, "{}", "Offer".magenta().bold());
    row(&mut out, "price", currency.format(offer.product_price));
    let conversion = ConversionTier::classify(offer.conversion_rate_percent);
    row(
        &mut out,
        "conversion",
        format!(
            "{}%  ({}: {})",
            number(offer.conversion_rate_percent),
            conversion,
            conversion.verdict()
        ),
    );
    row(
        &mut out,
        "commission",
        format!("{}% (fixed)", number(offer.commission_rate_percent)),
    );

    let _ = writeln!(out, "{}", "Results".magenta().bold());
    match (view.visible_result(), view.phase) {
        (Some(result), _) => {
            row(&mut out, "sales", result.sales_count);
            row(&mut out, "revenue", currency.format(result.total_revenue));
            let label = format!("benefit ({}%)", number(offer.commission_rate_percent));
            row(
                &mut out,
                &label,
                currency.format(result.benefit).green().bold(),
            );
        }
        (None, Phase::Computing) => {
            let _ = writeln!(out, "  {}", "calculating...".yellow());
        }
        (None, _) => {
            let _ = writeln!(out, "  {}", "run `calc` to calculate".dark_grey());
        }
    }

    out.trim_end().to_string()
}

/// Note about a finished calculation, if anything deserves one.
pub fn render_outcome(outcome: &CalculationOutcome) -> Option<String> {
    outcome.stale.then(|| {
        format!(
            "{} inputs changed while calculating; figures use the values at request time",
            "note:".yellow().bold()
        )
    })
}

/// The engagement and conversion guide.
pub fn render_guide() -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Engagement rate".magenta().bold());
    let _ = writeln!(out, "  Interaction quality as rated by SocialBlade.");
    for tier in EngagementTier::ALL {
        let _ = writeln!(
            out,
            "  {:12} {:6} {}",
            tier.to_string(),
            tier.range(),
            tier.verdict()
        );
    }

    let _ = writeln!(out, "{}", "Conversion rate".magenta().bold());
    let _ = writeln!(out, "  Share of the reach that buys, driven by trust and offer.");
    for tier in ConversionTier::ALL {
        let _ = writeln!(
            out,
            "  {:12} {:6} {}",
            tier.to_string(),
            tier.range(),
            tier.verdict()
        );
    }

    out.trim_end().to_string()
}
