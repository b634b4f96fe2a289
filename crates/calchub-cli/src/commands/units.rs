use clap::Args;
use rust_decimal::Decimal;

use calchub_core::units::conversion::{self, ConversionInput, Unit};

use super::{load_input, required, CommandResult};

/// Arguments for unit conversion
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ConvertArgs {
    /// Quantity to convert
    #[arg(long)]
    pub value: Option<Decimal>,

    /// Source unit (e.g. km, lb, f, gal)
    #[arg(long)]
    pub from: Option<Unit>,

    /// Target unit
    #[arg(long)]
    pub to: Option<Unit>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_convert(args: ConvertArgs) -> CommandResult {
    let convert_input: ConversionInput = load_input(args.input.as_deref(), || {
        Ok(ConversionInput {
            value: args.value.ok_or_else(|| required("value"))?,
            from: args.from.ok_or_else(|| required("from"))?,
            to: args.to.ok_or_else(|| required("to"))?,
        })
    })?;
    let result = conversion::calculate_conversion(&convert_input)?;
    Ok(serde_json::to_value(result)?)
}
