use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::*;
use crate::CalcHubResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZScoreInput {
    pub value: Decimal,
    pub mean: Decimal,
    pub std_dev: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZScoreOutput {
    pub z_score: Decimal,
    /// P(Z <= z) under the standard normal
    pub percentile: Decimal,
    /// P(Z > z)
    pub upper_tail: Decimal,
}

pub fn z_score(value: Decimal, mean: Decimal, std_dev: Decimal) -> CalcHubResult<Decimal> {
    require_positive("std_dev", std_dev)?;
    let deviation = in_range("value", value.checked_sub(mean))?;
    in_range("std_dev", deviation.checked_div(std_dev))
}

pub fn standard_normal_cdf(z: Decimal) -> CalcHubResult<Decimal> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| CalcHubError::invalid("std_dev", e.to_string()))?;
    let z = z
        .to_f64()
        .ok_or_else(|| CalcHubError::invalid("value", "z-score out of f64 range"))?;
    Decimal::from_f64(normal.cdf(z))
        .map(|p| p.round_dp(10))
        .ok_or_else(|| CalcHubError::invalid("value", "Probability not representable"))
}

pub fn calculate_z_score(input: &ZScoreInput) -> CalcHubResult<ComputationOutput<ZScoreOutput>> {
    let start = Instant::now();
    let z = z_score(input.value, input.mean, input.std_dev)?;
    let percentile = standard_normal_cdf(z)?;
    let output = ZScoreOutput {
        z_score: z,
        percentile,
        upper_tail: Decimal::ONE - percentile,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Standard score with standard normal CDF",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}
