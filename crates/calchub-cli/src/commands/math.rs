use clap::Args;
use rust_decimal::Decimal;

use calchub_core::math::base_conversion::{self, BaseConversionInput};
use calchub_core::math::ratio::{self, RatioInput};
use calchub_core::math::triangle::{self, TriangleInput};

use super::{load_input, required, CommandResult};

/// Arguments for ratio simplification
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RatioArgs {
    /// First term
    #[arg(long)]
    pub a: Option<i64>,

    /// Second term
    #[arg(long)]
    pub b: Option<i64>,

    /// Scale the simplified ratio so the first term equals this value
    #[arg(long)]
    pub scale_to: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for base conversion
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BaseArgs {
    /// Digits to convert, optionally signed
    #[arg(long)]
    pub value: Option<String>,

    /// Base of the input digits (2-36)
    #[arg(long, default_value = "10")]
    pub from: u32,

    /// Target base (2-36)
    #[arg(long)]
    pub to: Option<u32>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for triangle solving
#[derive(Args)]
pub struct TriangleArgs {
    #[arg(long)]
    pub a: Option<Decimal>,

    #[arg(long)]
    pub b: Option<Decimal>,

    #[arg(long)]
    pub c: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_ratio(args: RatioArgs) -> CommandResult {
    let ratio_input: RatioInput = load_input(args.input.as_deref(), || {
        Ok(RatioInput {
            a: args.a.ok_or_else(|| required("a"))?,
            b: args.b.ok_or_else(|| required("b"))?,
            scale_to: args.scale_to,
        })
    })?;
    let result = ratio::calculate_ratio(&ratio_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_base(args: BaseArgs) -> CommandResult {
    let base_input: BaseConversionInput = load_input(args.input.as_deref(), || {
        Ok(BaseConversionInput {
            value: args.value.clone().ok_or_else(|| required("value"))?,
            from_base: args.from,
            to_base: args.to.ok_or_else(|| required("to"))?,
        })
    })?;
    let result = base_conversion::calculate_base_conversion(&base_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_triangle(args: TriangleArgs) -> CommandResult {
    let triangle_input: TriangleInput = load_input(args.input.as_deref(), || {
        Ok(TriangleInput {
            a: args.a.ok_or_else(|| required("a"))?,
            b: args.b.ok_or_else(|| required("b"))?,
            c: args.c.ok_or_else(|| required("c"))?,
        })
    })?;
    let result = triangle::calculate_triangle(&triangle_input)?;
    Ok(serde_json::to_value(result)?)
}
