use clap::Args;
use rust_decimal::Decimal;

use calchub_core::statistics::descriptive::{self, DescriptiveInput};
use calchub_core::statistics::probability::{self, TwoEventInput};
use calchub_core::statistics::zscore::{self, ZScoreInput};

use super::{load_input, required, CommandResult};

/// Arguments for descriptive statistics
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct StatsArgs {
    /// Comma-separated values (e.g. 2,4,4,5)
    #[arg(long, value_delimiter = ',')]
    pub values: Vec<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for two-event probability
#[derive(Args)]
pub struct ProbabilityArgs {
    /// P(A), between 0 and 1
    #[arg(long)]
    pub p_a: Option<Decimal>,

    /// P(B), between 0 and 1
    #[arg(long)]
    pub p_b: Option<Decimal>,

    /// P(B|A) for dependent events
    #[arg(long)]
    pub p_b_given_a: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a z-score lookup
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ZScoreArgs {
    #[arg(long)]
    pub value: Option<Decimal>,

    #[arg(long)]
    pub mean: Option<Decimal>,

    /// Standard deviation
    #[arg(long)]
    pub std_dev: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_stats(args: StatsArgs) -> CommandResult {
    let stats_input: DescriptiveInput = load_input(args.input.as_deref(), || {
        if args.values.is_empty() {
            return Err(required("values").into());
        }
        Ok(DescriptiveInput {
            values: args.values.clone(),
        })
    })?;
    let result = descriptive::calculate_descriptive(&stats_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_probability(args: ProbabilityArgs) -> CommandResult {
    let prob_input: TwoEventInput = load_input(args.input.as_deref(), || {
        Ok(TwoEventInput {
            p_a: args.p_a.ok_or_else(|| required("p-a"))?,
            p_b: args.p_b.ok_or_else(|| required("p-b"))?,
            dependent: args.p_b_given_a.is_some(),
            p_b_given_a: args.p_b_given_a,
        })
    })?;
    let result = probability::calculate_two_events(&prob_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_zscore(args: ZScoreArgs) -> CommandResult {
    let z_input: ZScoreInput = load_input(args.input.as_deref(), || {
        Ok(ZScoreInput {
            value: args.value.ok_or_else(|| required("value"))?,
            mean: args.mean.ok_or_else(|| required("mean"))?,
            std_dev: args.std_dev.ok_or_else(|| required("std-dev"))?,
        })
    })?;
    let result = zscore::calculate_z_score(&z_input)?;
    Ok(serde_json::to_value(result)?)
}
