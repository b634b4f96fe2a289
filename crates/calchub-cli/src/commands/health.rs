use clap::Args;
use rust_decimal::Decimal;

use calchub_core::health::bmi::{self, BmiInput, MeasurementSystem};

use super::{load_input, required, CommandResult};

/// Arguments for BMI
#[derive(Args)]
pub struct BmiArgs {
    /// Weight in kg (or lb with --imperial)
    #[arg(long)]
    pub weight: Option<Decimal>,

    /// Height in cm (or inches with --imperial)
    #[arg(long)]
    pub height: Option<Decimal>,

    /// Use pounds and inches
    #[arg(long)]
    pub imperial: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_bmi(args: BmiArgs) -> CommandResult {
    let bmi_input: BmiInput = load_input(args.input.as_deref(), || {
        Ok(BmiInput {
            weight: args.weight.ok_or_else(|| required("weight"))?,
            height: args.height.ok_or_else(|| required("height"))?,
            system: if args.imperial {
                MeasurementSystem::Imperial
            } else {
                MeasurementSystem::Metric
            },
        })
    })?;
    let result = bmi::calculate_bmi(&bmi_input)?;
    Ok(serde_json::to_value(result)?)
}
