//! CLI argument definitions for Ferrocast.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `compare` | Run all four strategies over a CSV file and report their error |
//! | `preview` | Show the first rows and per-symbol counts of a CSV file |
//! | `strategies` | Describe the four prediction strategies |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--stream` | `false` | Emit NDJSON stream events |
//! | `-v` | off | Raise log verbosity (stderr) |
//!
//! # Examples
//!
//! ```bash
//! ferrocast compare all_stocks_5yr.csv --format table
//! ferrocast compare prices.csv --skip-invalid --strict-volume --pretty
//! ferrocast preview prices.csv --limit 5
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use ferrocast_core::{DEFAULT_PREDICTION_SAMPLE, DEFAULT_RAW_PREVIEW};

/// Ferrocast - compare naive next-close predictors on OHLCV data
#[derive(Debug, Parser)]
#[command(
    name = "ferrocast",
    author,
    version,
    about = "Compare naive next-close prediction strategies on stock price CSV files",
    long_about = "Ferrocast reads a CSV of OHLCV stock records, predicts each record's close with \
four fixed strategies (linear model, heuristic, FOL rule, CSP rule) and reports the mean \
absolute error of each.\n\
\n\
Use 'ferrocast <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings (such as skipped records) as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Emit newline-delimited stream events (start, progress, chunk, error, end).
    #[arg(long, global = true, default_value_t = false)]
    pub stream: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug). `FERROCAST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and a bar chart.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON.
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict every record with all four strategies and report MAE per strategy.
    ///
    /// # Examples
    ///
    ///   ferrocast compare prices.csv
    ///   ferrocast compare prices.csv --sample 5 --format table
    ///   ferrocast compare prices.csv --skip-invalid
    Compare(CompareArgs),

    /// Show the first rows of a CSV file and per-symbol volume statistics.
    Preview(PreviewArgs),

    /// Describe the four prediction strategies.
    Strategies,
}

/// Options shared by every command that reads a CSV file.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// CSV file with a `Name`/`symbol` column and open, high, low, close, volume columns.
    pub file: PathBuf,

    /// Field delimiter.
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Treat a missing volume as an invalid record instead of volume 0.
    #[arg(long, default_value_t = false)]
    pub strict_volume: bool,

    /// Skip invalid records instead of aborting the run.
    #[arg(long, default_value_t = false)]
    pub skip_invalid: bool,

    /// Number of predictions in the sample table and line chart.
    #[arg(long, default_value_t = DEFAULT_PREDICTION_SAMPLE)]
    pub sample: usize,

    /// Number of raw records in the preview.
    #[arg(long, default_value_t = DEFAULT_RAW_PREVIEW)]
    pub preview: usize,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of raw records to show.
    #[arg(long, default_value_t = DEFAULT_RAW_PREVIEW)]
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_defaults() {
        let cli = Cli::try_parse_from(["ferrocast", "compare", "prices.csv"]).expect("parses");
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.sample, 20);
        assert_eq!(args.preview, 10);
        assert_eq!(args.input.delimiter, ',');
        assert!(!args.skip_invalid);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ferrocast",
            "preview",
            "prices.csv",
            "--format",
            "table",
            "-vv",
        ])
        .expect("parses");
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.verbose, 2);
    }
}
