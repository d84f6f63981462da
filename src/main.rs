use analytics::SummaryRow;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use configuration::{PathOverrides, init_tracing, load_config};
use mock_data::MockDataConfig;
use pipeline::{ErrorKind, RunOutcome};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;

/// The main entry point for the sentiment report.
fn main() -> ExitCode {
    // A missing .env file is fine; overrides can also come from the shell.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Relates trader performance to the daily fear & greed index.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file. Defaults to ./sentiment.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Join trades with sentiment and write the report.
    Run(RunArgs),
    /// Write mock input files to the configured data paths.
    Generate(GenerateArgs),
}

#[derive(Parser)]
struct RunArgs {
    #[command(flatten)]
    paths: PathOverrides,
}

#[derive(Parser)]
struct GenerateArgs {
    /// Number of trades to generate.
    #[arg(long, default_value_t = 500)]
    trades: usize,

    /// Seed for reproducible files.
    #[arg(long)]
    seed: Option<u64>,

    /// First sentiment day (format: YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    from: NaiveDate,

    /// Last sentiment day (format: YYYY-MM-DD).
    #[arg(long, default_value = "2023-12-31")]
    to: NaiveDate,
}

fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging, cli.verbose).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Run(args) => {
            config.apply_overrides(&args.paths);
            Ok(handle_run(&config))
        }
        Commands::Generate(args) => {
            handle_generate(&config.data, args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ==============================================================================
// Run Command Logic
// ==============================================================================

fn handle_run(config: &configuration::settings::Config) -> ExitCode {
    match pipeline::run(config) {
        Ok(outcome) => {
            print_summary(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            // Every stage logs its own failure before returning it.
            let kind = e.kind();
            match kind {
                ErrorKind::EmptyResult | ErrorKind::MissingColumn => eprintln!("No report written: {e}"),
                _ => eprintln!("Error: {e}"),
            }
            exit_code(kind)
        }
    }
}

/// Exit status for each failure kind.
fn exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::EmptyResult | ErrorKind::MissingColumn => ExitCode::SUCCESS,
        ErrorKind::MissingFile => ExitCode::from(1),
        ErrorKind::Parse | ErrorKind::Io | ErrorKind::Internal => ExitCode::from(2),
    }
}

fn print_summary(outcome: &RunOutcome) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Sentiment").add_attribute(Attribute::Bold),
            Cell::new("Trades").add_attribute(Attribute::Bold),
            Cell::new("Avg PnL").add_attribute(Attribute::Bold),
            Cell::new("Profit %").add_attribute(Attribute::Bold),
            Cell::new("Avg Size USD").add_attribute(Attribute::Bold),
        ]);

    for SummaryRow {
        classification,
        trade_count,
        average_pnl,
        profit_rate_pct,
        average_size,
    } in outcome.analysis.summary_rows()
    {
        table.add_row(vec![
            Cell::new(classification.label()),
            Cell::new(trade_count),
            Cell::new(two_places(average_pnl)),
            Cell::new(format!("{}%", two_places(profit_rate_pct))),
            Cell::new(two_places(average_size)),
        ]);
    }

    println!("{table}");
    println!(
        "{} of {} trades matched a sentiment day ({} unmatched). Report written to:",
        outcome.merged_records, outcome.trades_total, outcome.trades_unmatched
    );
    for path in outcome.artifacts.paths() {
        println!("  {}", path.display());
    }
}

fn two_places(value: Decimal) -> String {
    format!("{:.2}", value)
}

// ==============================================================================
// Generate Command Logic
// ==============================================================================

fn handle_generate(data: &configuration::DataPaths, args: GenerateArgs) -> anyhow::Result<()> {
    let files = mock_data::generate(&MockDataConfig {
        trades_path: data.trades_path.clone(),
        sentiment_path: data.sentiment_path.clone(),
        start: args.from,
        end: args.to,
        num_trades: args.trades,
        seed: args.seed,
    })
    .context("Failed to generate mock data")?;

    println!(
        "Created {} with {} rows.",
        files.sentiment_path.display(),
        files.sentiment_days
    );
    println!("Created {} with {} rows.", files.trades_path.display(), files.trades);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_exit_kinds_are_not_failures() {
        assert_eq!(exit_code(ErrorKind::EmptyResult), ExitCode::SUCCESS);
        assert_eq!(exit_code(ErrorKind::MissingColumn), ExitCode::SUCCESS);
        assert_eq!(exit_code(ErrorKind::MissingFile), ExitCode::from(1));
        assert_eq!(exit_code(ErrorKind::Parse), ExitCode::from(2));
    }

    #[test]
    fn cli_parses_run_overrides() {
        let cli = Cli::parse_from(["sentiment-report", "-v", "run", "--trades", "t.csv", "--output-dir", "out"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.paths.trades, Some(PathBuf::from("t.csv")));
                assert_eq!(args.paths.output_dir, Some(PathBuf::from("out")));
                assert!(args.paths.sentiment.is_none());
            }
            Commands::Generate(_) => panic!("expected run"),
        }
    }

    #[test]
    fn cli_parses_generate_options() {
        let cli = Cli::parse_from(["sentiment-report", "generate", "--trades", "20", "--seed", "3"]);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.trades, 20);
                assert_eq!(args.seed, Some(3));
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
            }
            Commands::Run(_) => panic!("expected generate"),
        }
    }
}
