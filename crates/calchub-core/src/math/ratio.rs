use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::*;
use crate::CalcHubResult;

/// Greatest common divisor of the absolute values (Euclid).
pub fn gcd(a: i64, b: i64) -> u64 {
    let (mut x, mut y) = (a.unsigned_abs(), b.unsigned_abs());
    while y != 0 {
        let r = x % y;
        x = y;
        y = r;
    }
    x
}

/// Least common multiple; zero if either side is zero.
pub fn lcm(a: i64, b: i64) -> CalcHubResult<u64> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    let g = gcd(a, b);
    (a.unsigned_abs() / g)
        .checked_mul(b.unsigned_abs())
        .ok_or_else(|| CalcHubError::invalid("b", "Least common multiple overflows"))
}

/// Reduce `a:b` to lowest terms. The sign is carried on the first term.
pub fn simplify_ratio(a: i64, b: i64) -> CalcHubResult<(i64, i64)> {
    if a == 0 && b == 0 {
        return Err(CalcHubError::invalid("b", "Ratio 0:0 is undefined"));
    }
    let g = gcd(a, b);
    let negative = (a < 0) != (b < 0) && a != 0 && b != 0;
    let first = (a.unsigned_abs() / g) as i128;
    let second = (b.unsigned_abs() / g) as i128;
    let first = if negative { -first } else { first };
    let first = i64::try_from(first).map_err(|_| CalcHubError::invalid("a", "Ratio term out of range"))?;
    let second = i64::try_from(second).map_err(|_| CalcHubError::invalid("b", "Ratio term out of range"))?;
    Ok((first, second))
}

/// Input for the ratio calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    pub a: i64,
    pub b: i64,
    /// Scale the simplified ratio so its first term equals this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_to: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioOutput {
    pub simplified: (i64, i64),
    pub gcd: u64,
    /// Least common multiple of the original terms; absent when it overflows u64
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lcm: Option<u64>,
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaled: Option<(Decimal, Decimal)>,
}

pub fn calculate_ratio(input: &RatioInput) -> CalcHubResult<ComputationOutput<RatioOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let simplified = simplify_ratio(input.a, input.b)?;

    let scaled = match input.scale_to {
        Some(target) if simplified.0 == 0 => {
            warnings.push(format!("Cannot scale a ratio with a zero first term to {target}"));
            None
        }
        Some(target) => {
            let factor = target / Decimal::from(simplified.0);
            match Decimal::from(simplified.1).checked_mul(factor) {
                Some(second) => Some((target, second)),
                None => {
                    warnings.push(format!(
                        "Scaling {}:{} to {target} exceeds the representable range",
                        simplified.0, simplified.1
                    ));
                    None
                }
            }
        }
        None => None,
    };

    let output = RatioOutput {
        simplified,
        gcd: gcd(input.a, input.b),
        lcm: lcm(input.a, input.b).ok(),
        display: format!("{}:{}", simplified.0, simplified.1),
        scaled,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Ratio reduction by greatest common divisor (Euclidean algorithm)",
        &serde_json::json!({ "a": input.a, "b": input.b }),
        warnings,
        elapsed,
        output,
    ))
}
