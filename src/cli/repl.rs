//! Interactive calculator session.

use std::sync::Arc;

use crossterm::style::Stylize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::render::{render_guide, render_outcome, render_view};
use crate::config::CalculatorConfig;
use crate::estimation::InputField;
use crate::format::CurrencyFormat;
use crate::links::{Browser, open_profile};
use crate::session::{CalculatorSession, PendingCalculation};

const HELP: &str = "\
Commands:
  set <field> <value>   change an input (username, followers, engagement,
                        reach, price, conversion)
  sync                  set reach from followers × engagement
  calc                  calculate in the background (gated calculator)
  reset                 zero the results (gated calculator)
  cancel                abort a pending calculation
  show                  print inputs and results
  open                  open the creator's SocialBlade page
  guide                 show the engagement and conversion guide
  help                  show this help
  quit                  leave";

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Set { field: InputField, value: String },
    Sync,
    Calc,
    Reset,
    Cancel,
    Show,
    Open,
    Guide,
    Help,
    Quit,
    Empty,
}

impl ReplCommand {
    /// Parse a line; the error is a message for the user.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word.to_lowercase().as_str() {
            "" => Ok(ReplCommand::Empty),
            "set" => {
                let (name, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(n, v)| (n, v.trim()))
                    .unwrap_or((rest, ""));
                if name.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                let field = name.parse::<InputField>().map_err(|e| e.to_string())?;
                Ok(ReplCommand::Set {
                    field,
                    value: value.to_string(),
                })
            }
            "sync" => Ok(ReplCommand::Sync),
            "calc" | "calculate" => Ok(ReplCommand::Calc),
            "reset" => Ok(ReplCommand::Reset),
            "cancel" => Ok(ReplCommand::Cancel),
            "show" => Ok(ReplCommand::Show),
            "open" => Ok(ReplCommand::Open),
            "guide" => Ok(ReplCommand::Guide),
            "help" | "?" => Ok(ReplCommand::Help),
            "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
            other => Err(format!("Unknown command: {} (try `help`)", other)),
        }
    }
}

/// Run the REPL until `quit`, Ctrl-C or Ctrl-D.
pub async fn run_interactive(
    session: Arc<dyn CalculatorSession>,
    config: &CalculatorConfig,
    browser: &dyn Browser,
) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let currency = config.currency();

    println!(
        "{} ({} calculator, {})",
        "Creator potential calculator".magenta().bold(),
        session.variant(),
        currency.currency()
    );
    println!("Type `help` for commands.\n");
    println!("{}\n", render_view(&session.view().await, currency));

    loop {
        let line = match tokio::task::block_in_place(|| editor.readline("potential> ")) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let _ = editor.add_history_entry(line.as_str());

        let command = match ReplCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.red());
                continue;
            }
        };

        match execute(&session, config, browser, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{}", e.to_string().red()),
        }
    }

    Ok(())
}

/// Wait for a calculation and build the report shown when it lands.
///
/// `None` if the calculation was cancelled or reset away.
async fn report_when_done(
    session: Arc<dyn CalculatorSession>,
    pending: PendingCalculation,
    currency: CurrencyFormat,
) -> Option<String> {
    let outcome = pending.wait().await?;
    let mut report = render_view(&session.view().await, currency);
    if let Some(note) = render_outcome(&outcome) {
        report.push('\n');
        report.push_str(&note);
    }
    Some(report)
}

/// Execute one command. Returns `false` when the session should end.
///
/// `calc` returns as soon as the calculation is scheduled, so `set`,
/// `cancel` and `reset` stay available during the delay.
async fn execute(
    session: &Arc<dyn CalculatorSession>,
    config: &CalculatorConfig,
    browser: &dyn Browser,
    command: ReplCommand,
) -> anyhow::Result<bool> {
    let currency = config.currency();

    match command {
        ReplCommand::Empty => {}
        ReplCommand::Quit => return Ok(false),
        ReplCommand::Help => println!("{}", HELP),
        ReplCommand::Guide => println!("{}", render_guide()),
        ReplCommand::Show => println!("{}", render_view(&session.view().await, currency)),
        ReplCommand::Set { field, value } => {
            session.set_field(field, &value).await?;
            let view = session.view().await;
            match view.visible_result() {
                Some(result) => println!(
                    "{} = {}  →  benefit {}",
                    field,
                    value,
                    currency.format(result.benefit).green().bold()
                ),
                None => println!("{} = {}", field, value),
            }
        }
        ReplCommand::Sync => {
            let reach = session.sync_reach().await?;
            println!("active reach = {}", reach);
        }
        ReplCommand::Calc => match session.calculate().await? {
            Some(pending) => {
                println!("{}", "Calculating... (`cancel` to abort)".yellow());
                let session = Arc::clone(session);
                tokio::spawn(async move {
                    if let Some(report) = report_when_done(session, pending, currency).await {
                        println!("\n{}", report);
                    }
                });
            }
            None => println!("A calculation is already running."),
        },
        ReplCommand::Reset => {
            session.reset().await?;
            println!("Results cleared.");
        }
        ReplCommand::Cancel => {
            if session.cancel().await? {
                println!("Calculation cancelled.");
            } else {
                println!("Nothing to cancel.");
            }
        }
        ReplCommand::Open => {
            let username = session.view().await.inputs.profile.username;
            match open_profile(browser, &username, config.platform)? {
                Some(url) => println!("Opened {}", url),
                None => println!("Set a username first."),
            }
        }
    }

    Ok(true)
}
