//! Command-line interface.
//!
//! One-shot commands print a report; `interactive` runs a REPL over a
//! calculator session.

mod render;
mod repl;

pub use render::{render_guide, render_outcome, render_view};
pub use repl::{ReplCommand, run_interactive};

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{CalculatorConfig, Variant, parse_commission_rate};
use crate::error::ConfigError;
use crate::estimation::{DEFAULT_COMMISSION_RATE, InputField};
use crate::links::{Platform, SystemBrowser, open_profile};
use crate::session::{
    CalculatorSession, GatedSession, LiveSession, Phase, SnapshotPolicy, TriggerOutcome,
    build_session,
};

#[derive(Parser, Debug)]
#[command(
    name = "creator-potential",
    version,
    about = "Estimate the sales potential of an Instagram creator"
)]
pub struct Cli {
    /// Calculator to use: live (feed-based, EUR) or gated (reach-based, USD)
    #[arg(long, global = true, env = "CREATOR_POTENTIAL_VARIANT", default_value = "gated")]
    pub variant: Variant,

    /// Processing delay of the gated calculator, in milliseconds
    #[arg(long, global = true, env = "CREATOR_POTENTIAL_DELAY_MS", default_value_t = 600)]
    pub delay_ms: u64,

    /// Commission applied to total revenue, in percent (0 to 100)
    #[arg(long, global = true, env = "CREATOR_POTENTIAL_COMMISSION", default_value_t = DEFAULT_COMMISSION_RATE, value_parser = parse_commission_rate)]
    pub commission: f64,

    /// Inputs a delayed calculation uses: at-trigger or at-completion
    #[arg(long, global = true, env = "CREATOR_POTENTIAL_SNAPSHOT", default_value = "at-trigger")]
    pub snapshot: SnapshotPolicy,

    /// Network for profile links
    #[arg(long, global = true, env = "CREATOR_POTENTIAL_PLATFORM", default_value = "instagram")]
    pub platform: Platform,

    /// Log output format
    #[arg(long, global = true, env = "CREATOR_POTENTIAL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Interactive calculator session (default)
    Interactive,

    /// Feed-based estimate: followers × engagement × conversion
    Estimate(EstimateArgs),

    /// Reach-based forecast, computed after the processing delay
    Forecast(ForecastArgs),

    /// Open the SocialBlade statistics page for a username
    Open {
        /// Username, with or without a leading @
        username: String,
    },

    /// Show the engagement and conversion guide
    Guide,
}

/// Offer and audience values; anything omitted keeps its default.
///
/// Values are taken as typed: blank counts as 0 and non-numbers yield no
/// figures, just like the form fields.
#[derive(Args, Debug, Clone, Default)]
pub struct MetricArgs {
    /// Number of followers
    #[arg(long)]
    pub followers: Option<String>,

    /// Engagement rate in percent
    #[arg(long)]
    pub engagement: Option<String>,

    /// Conversion rate in percent
    #[arg(long)]
    pub conversion: Option<String>,

    /// Product price
    #[arg(long)]
    pub price: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl MetricArgs {
    fn fields(&self) -> Vec<(InputField, &str)> {
        [
            (InputField::Followers, &self.followers),
            (InputField::EngagementRate, &self.engagement),
            (InputField::ConversionRate, &self.conversion),
            (InputField::ProductPrice, &self.price),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub metrics: MetricArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ForecastArgs {
    /// Active reach (e.g. story views)
    #[arg(long, conflicts_with = "sync")]
    pub reach: Option<String>,

    /// Derive the active reach from followers × engagement
    #[arg(long)]
    pub sync: bool,

    #[command(flatten)]
    pub metrics: MetricArgs,
}

impl Cli {
    /// Session configuration from flags and environment.
    pub fn config(&self) -> Result<CalculatorConfig, ConfigError> {
        Ok(CalculatorConfig::default()
            .with_variant(self.variant)
            .with_delay(Duration::from_millis(self.delay_ms))
            .with_commission_rate(self.commission)?
            .with_snapshot(self.snapshot)
            .with_platform(self.platform))
    }
}

/// Run the parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config()?;
    tracing::debug!(?config, "Starting");

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let session = build_session(&config);
            run_interactive(session, &config, &SystemBrowser).await
        }
        Command::Estimate(args) => run_estimate(&config, &args).await,
        Command::Forecast(args) => run_forecast(&config, &args).await,
        Command::Open { username } => {
            match open_profile(&SystemBrowser, &username, config.platform)? {
                Some(url) => println!("Opened {}", url),
                None => println!("No username given, nothing to open"),
            }
            Ok(())
        }
        Command::Guide => {
            println!("{}", render_guide());
            Ok(())
        }
    }
}

async fn run_estimate(config: &CalculatorConfig, args: &EstimateArgs) -> anyhow::Result<()> {
    let config = config.clone().with_variant(Variant::Live);
    let session = LiveSession::new(config.initial_inputs());
    for (field, value) in args.metrics.fields() {
        session.set_field(field, value).await?;
    }

    let view = session.view().await;
    if args.metrics.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_view(&view, config.currency()));
    }
    Ok(())
}

async fn run_forecast(config: &CalculatorConfig, args: &ForecastArgs) -> anyhow::Result<()> {
    let config = config.clone().with_variant(Variant::Gated);
    let session = GatedSession::new(config.trigger.clone(), config.initial_inputs());
    for (field, value) in args.metrics.fields() {
        session.set_field(field, value).await?;
    }
    if let Some(reach) = &args.reach {
        session.set_field(InputField::ActiveReach, reach).await?;
    }
    if args.sync {
        let reach = session.sync_reach_from_feed().await;
        tracing::info!(reach, "Active reach synced from feed");
    }

    let mut phases = session.subscribe();
    if let TriggerOutcome::Ignored = session.trigger().await {
        anyhow::bail!("A calculation is already running");
    }
    if !args.metrics.json {
        eprintln!("Calculating...");
    }
    phases.wait_for(|phase| *phase == Phase::Ready).await?;

    let view = session.view().await;
    if args.metrics.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_view(&view, config.currency()));
    }
    Ok(())
}
