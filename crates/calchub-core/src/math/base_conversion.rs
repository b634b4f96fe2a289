use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::*;
use crate::CalcHubResult;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One step of the repeated-division trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionStep {
    pub dividend: u128,
    pub quotient: u128,
    pub remainder: u32,
    pub digit: char,
}

/// Output of a base conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseConversionOutput {
    pub input: String,
    pub from_base: u32,
    pub to_base: u32,
    pub decimal_value: String,
    pub result: String,
    /// Least significant digit first, as produced by the division loop
    pub steps: Vec<DivisionStep>,
}

/// Input for the base converter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseConversionInput {
    pub value: String,
    pub from_base: u32,
    pub to_base: u32,
}

fn check_base(field: &str, base: u32) -> CalcHubResult<()> {
    if !(2..=36).contains(&base) {
        return Err(CalcHubError::invalid(field, format!("Base {base} outside 2..=36")));
    }
    Ok(())
}

/// Parse `digits` in `base` into a magnitude and sign.
pub fn parse_in_base(value: &str, base: u32) -> CalcHubResult<(bool, u128)> {
    check_base("from_base", base)?;
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() {
        return Err(CalcHubError::invalid("value", "No digits to convert"));
    }

    let mut magnitude: u128 = 0;
    for ch in digits.chars() {
        let d = ch
            .to_digit(base)
            .ok_or_else(|| CalcHubError::invalid("value", format!("'{ch}' is not a base-{base} digit")))?;
        magnitude = magnitude
            .checked_mul(base as u128)
            .and_then(|m| m.checked_add(d as u128))
            .ok_or_else(|| CalcHubError::invalid("value", "Value exceeds 128-bit range"))?;
    }
    Ok((negative && magnitude != 0, magnitude))
}

/// Render `magnitude` in `base` by repeated division, keeping the trace.
pub fn to_base_with_steps(magnitude: u128, base: u32) -> CalcHubResult<(String, Vec<DivisionStep>)> {
    check_base("to_base", base)?;
    if magnitude == 0 {
        return Ok(("0".to_string(), Vec::new()));
    }

    let b = base as u128;
    let mut n = magnitude;
    let mut steps = Vec::new();
    let mut out = Vec::new();
    while n > 0 {
        let quotient = n / b;
        let remainder = (n % b) as u32;
        let digit = DIGITS[remainder as usize] as char;
        steps.push(DivisionStep {
            dividend: n,
            quotient,
            remainder,
            digit,
        });
        out.push(digit);
        n = quotient;
    }
    out.reverse();
    Ok((out.into_iter().collect(), steps))
}

/// Convert `value` from `from_base` to `to_base` (bases 2 through 36).
pub fn convert_base(value: &str, from_base: u32, to_base: u32) -> CalcHubResult<BaseConversionOutput> {
    let (negative, magnitude) = parse_in_base(value, from_base)?;
    let (digits, steps) = to_base_with_steps(magnitude, to_base)?;
    let sign = if negative { "-" } else { "" };

    Ok(BaseConversionOutput {
        input: value.trim().to_string(),
        from_base,
        to_base,
        decimal_value: format!("{sign}{magnitude}"),
        result: format!("{sign}{digits}"),
        steps,
    })
}

pub fn calculate_base_conversion(
    input: &BaseConversionInput,
) -> CalcHubResult<ComputationOutput<BaseConversionOutput>> {
    let start = Instant::now();
    let output = convert_base(&input.value, input.from_base, input.to_base)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Positional parse then repeated division by the target base",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}
