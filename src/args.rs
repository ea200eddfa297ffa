//! These structs provide the CLI interface for the ledger CLI.

use crate::commands::OutputFormat;
use crate::state::AmountScope;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// ledger: A command-line tool for viewing customer transactions.
///
/// The program downloads a customer and transaction dataset from a JSON endpoint, filters the
/// customers by name and the transactions by a minimum amount, and shows the result as a table of
/// transactions and a chart of the total amount per customer.
///
/// The endpoint can be an http(s) URL, a file:// URL or a path to a local JSON file shaped like
/// `{ "customers": [...], "transactions": [...] }`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a config file with default settings.
    ///
    /// The file is written to --config if given, otherwise to $HOME/.ledger/config.json. Running
    /// without a config file is fine: every setting has a default.
    Init(InitArgs),
    /// Load the dataset once and report what was loaded. Exits non-zero if the load fails.
    Fetch,
    /// Show the transactions table followed by the per-customer chart.
    Show(ViewArgs),
    /// Show only the transactions table.
    Table(ViewArgs),
    /// Show only the per-customer chart. With --format json, prints a Chart.js data object.
    Chart(ViewArgs),
    /// Load the dataset once, then change the queries from stdin and see the output re-render.
    ///
    /// Type `help` at the prompt for the list of commands.
    Interactive(ViewArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The config file. Defaults to $HOME/.ledger/config.json, which is optional.
    #[arg(long, global = true, env = "LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// The URL or path of the customer data. Overrides the endpoint in the config file.
    #[arg(long, global = true, env = "LEDGER_ENDPOINT")]
    endpoint: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: Option<PathBuf>, endpoint: Option<String>) -> Self {
        Self {
            log_level,
            config,
            endpoint,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

/// (Not shown): Args for the `ledger init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Overwrite the config file if it exists.
    #[arg(long)]
    force: bool,
}

impl InitArgs {
    pub fn new(force: bool) -> Self {
        Self { force }
    }

    pub fn force(&self) -> bool {
        self.force
    }
}

/// (Not shown): Args for the `show`, `table`, `chart` and `interactive` commands.
#[derive(Debug, Parser, Clone, Default)]
pub struct ViewArgs {
    /// Only show customers whose name contains this text, ignoring case.
    #[arg(long, short = 'n', default_value = "")]
    name: String,

    /// Only count transactions whose amount is at least this number. A value that is not a number
    /// matches no transactions.
    #[arg(long, short = 'm', default_value = "", allow_hyphen_values = true)]
    min_amount: String,

    /// Whether --min-amount changes what is displayed: "ignored" only reports how many
    /// transactions match, "display" also removes the others from the table and chart. Defaults
    /// to the config file's setting.
    #[arg(long, value_enum)]
    amount_scope: Option<AmountScope>,

    /// The output format.
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ViewArgs {
    pub fn new(
        name: impl Into<String>,
        min_amount: impl Into<String>,
        amount_scope: Option<AmountScope>,
        format: OutputFormat,
    ) -> Self {
        Self {
            name: name.into(),
            min_amount: min_amount.into(),
            amount_scope,
            format,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_amount(&self) -> &str {
        &self.min_amount
    }

    pub fn amount_scope(&self) -> Option<AmountScope> {
        self.amount_scope
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_show() {
        let args = Args::try_parse_from([
            "ledger",
            "--endpoint",
            "data.json",
            "show",
            "--name",
            "al",
            "--min-amount",
            "-5",
            "--amount-scope",
            "display",
            "--format",
            "csv",
        ])
        .unwrap();
        assert_eq!(args.common().endpoint(), Some("data.json"));
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        match args.command() {
            Command::Show(view) => {
                assert_eq!(view.name(), "al");
                assert_eq!(view.min_amount(), "-5");
                assert_eq!(view.amount_scope(), Some(AmountScope::Display));
                assert_eq!(view.format(), OutputFormat::Csv);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["ledger", "table"]).unwrap();
        match args.command() {
            Command::Table(view) => {
                assert_eq!(view.name(), "");
                assert_eq!(view.min_amount(), "");
                assert_eq!(view.amount_scope(), None);
                assert_eq!(view.format(), OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_log_level_and_init() {
        let args =
            Args::try_parse_from(["ledger", "--log-level", "debug", "init", "--force"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        match args.command() {
            Command::Init(init) => assert!(init.force()),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_after_subcommand() {
        let args =
            Args::try_parse_from(["ledger", "init", "--endpoint", "https://example.com/c.json"])
                .unwrap();
        assert_eq!(args.common().endpoint(), Some("https://example.com/c.json"));
    }

    #[test]
    fn test_parse_bad_scope() {
        assert!(Args::try_parse_from(["ledger", "chart", "--amount-scope", "all"]).is_err());
    }
}
