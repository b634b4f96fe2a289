mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::finance::{CompoundArgs, LoanArgs, PayoffArgs};
use commands::health::BmiArgs;
use commands::math::{BaseArgs, RatioArgs, TriangleArgs};
use commands::statistics::{ProbabilityArgs, StatsArgs, ZScoreArgs};
use commands::units::ConvertArgs;

/// Everyday calculators with decimal precision
#[derive(Parser)]
#[command(
    name = "calchub",
    version,
    about = "Everyday calculators with decimal precision",
    long_about = "A CLI for loan amortization, payoff planning and compound growth, \
                  plus ratio, base conversion, triangle, statistics, unit and BMI \
                  calculators. Every result is computed in decimal arithmetic."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation steps to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Amortization schedule for a fixed-rate loan, mortgage or student loan
    Loan(LoanArgs),
    /// Payment or time needed to pay off a balance
    Payoff(PayoffArgs),
    /// Compound interest growth with optional contributions
    Compound(CompoundArgs),
    /// Simplify a ratio by its greatest common divisor
    Ratio(RatioArgs),
    /// Convert an integer between bases 2 to 36
    Base(BaseArgs),
    /// Area, angles and classification of a triangle from three sides
    Triangle(TriangleArgs),
    /// Descriptive statistics for a list of values
    Stats(StatsArgs),
    /// Combined probabilities of two events
    Probability(ProbabilityArgs),
    /// Z-score and normal percentile
    Zscore(ZScoreArgs),
    /// Convert length, mass, temperature or volume
    Convert(ConvertArgs),
    /// Body Mass Index
    Bmi(BmiArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: commands::CommandResult = match cli.command {
        Commands::Loan(args) => commands::finance::run_loan(args),
        Commands::Payoff(args) => commands::finance::run_payoff(args),
        Commands::Compound(args) => commands::finance::run_compound(args),
        Commands::Ratio(args) => commands::math::run_ratio(args),
        Commands::Base(args) => commands::math::run_base(args),
        Commands::Triangle(args) => commands::math::run_triangle(args),
        Commands::Stats(args) => commands::statistics::run_stats(args),
        Commands::Probability(args) => commands::statistics::run_probability(args),
        Commands::Zscore(args) => commands::statistics::run_zscore(args),
        Commands::Convert(args) => commands::units::run_convert(args),
        Commands::Bmi(args) => commands::health::run_bmi(args),
        Commands::Version => {
            println!("calchub {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
