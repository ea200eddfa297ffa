use clap::Parser;
use customer_ledger::args::{Args, Command};
use customer_ledger::commands::{self, Out, Report};
use customer_ledger::{Config, Result};
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => {
            commands::init(common.config(), common.endpoint(), init_args.force())
                .await?
                .print()
        }

        Command::Fetch => commands::fetch(load_config(&args).await?)
            .await?
            .print(),

        Command::Show(view_args) => print_report(
            commands::show(load_config(&args).await?, view_args.clone()).await?,
        ),

        Command::Table(view_args) => print_report(
            commands::table(load_config(&args).await?, view_args.clone()).await?,
        ),

        Command::Chart(view_args) => print_report(
            commands::chart(load_config(&args).await?, view_args.clone()).await?,
        ),

        Command::Interactive(view_args) => commands::interactive(
            load_config(&args).await?,
            view_args.clone(),
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await?
        .print(),
    };
    Ok(())
}

/// Loads the config file, then applies the `--endpoint` override.
async fn load_config(args: &Args) -> Result<Config> {
    let config = Config::load(args.common().config())
        .await?
        .with_endpoint(args.common().endpoint());
    debug!("Using endpoint {}", config.endpoint());
    Ok(config)
}

/// Writes the rendered report to stdout and the summary to the log.
fn print_report(out: Out<Report>) {
    if let Some(report) = out.structure() {
        print!("{report}");
    }
    out.print();
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "customer_ledger={},{}={}",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
