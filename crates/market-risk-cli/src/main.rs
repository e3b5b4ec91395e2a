mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::hedge::HedgeArgs;
use commands::report::{GenerateArgs, ReportArgs, VarArgs};
use commands::stress::StressArgs;

/// One-shot portfolio market risk snapshot
#[derive(Parser)]
#[command(
    name = "mrisk",
    version,
    about = "Portfolio market risk snapshot: VaR, CVaR, stress, limits and hedging",
    long_about = "Estimates portfolio market risk over a fixed return history using \
                  historical, parametric and Monte Carlo VaR, historical CVaR, a \
                  uniform stress shock, per-asset risk limits and a constant-offset \
                  hedge, then prints a summary table and a return histogram."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print the summary table and chart
    Report(ReportArgs),
    /// Historical, parametric and Monte Carlo VaR plus CVaR per asset
    Var(VarArgs),
    /// Portfolio stress loss under a uniform (or per-asset) shock
    Stress(StressArgs),
    /// Apply a constant hedge cost to a VaR figure
    Hedge(HedgeArgs),
    /// Print the synthetic return table
    Generate(GenerateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::report::run_report(args),
        Commands::Var(args) => commands::report::run_var(args),
        Commands::Stress(args) => commands::stress::run_stress(args),
        Commands::Hedge(args) => commands::hedge::run_hedge(args),
        Commands::Generate(args) => commands::report::run_generate(args),
        Commands::Version => {
            println!("mrisk {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
