use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::*;
use crate::CalcHubResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptiveInput {
    pub values: Vec<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptiveOutput {
    pub count: usize,
    pub sum: Decimal,
    pub mean: Decimal,
    pub median: Decimal,
    /// Every value tied for the highest frequency; empty when all values are unique
    pub modes: Vec<Decimal>,
    pub min: Decimal,
    pub max: Decimal,
    pub range: Decimal,
    pub population_variance: Decimal,
    pub population_std_dev: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_variance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_std_dev: Option<Decimal>,
}

fn sqrt(field: &str, value: Decimal) -> CalcHubResult<Decimal> {
    value
        .sqrt()
        .ok_or_else(|| CalcHubError::invalid(field, "Square root of a negative variance"))
}

pub fn median(sorted: &[Decimal]) -> Option<Decimal> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    Some(if n % 2 == 1 {
        sorted[n / 2]
    } else {
        let (lower, upper) = (sorted[n / 2 - 1], sorted[n / 2]);
        match lower.checked_add(upper) {
            Some(total) => total / dec!(2),
            // only same-signed pairs overflow, so the difference fits
            None => lower + (upper - lower) / dec!(2),
        }
    })
}

pub fn modes(values: &[Decimal]) -> Vec<Decimal> {
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for v in values {
        // normalize so 2.0 and 2.00 count as the same value
        *counts.entry(v.normalize()).or_insert(0) += 1;
    }
    let top = counts.values().copied().max().unwrap_or(0);
    if top <= 1 {
        return Vec::new();
    }
    counts
        .into_iter()
        .filter(|(_, c)| *c == top)
        .map(|(v, _)| v)
        .collect()
}

pub fn describe(values: &[Decimal]) -> CalcHubResult<DescriptiveOutput> {
    if values.is_empty() {
        return Err(CalcHubError::InsufficientData(
            "At least one value is required".into(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort();

    let count = values.len();
    let n = Decimal::from(count);
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| in_range("values", acc.checked_add(*v)))?;
    let mean = sum / n;
    let squared_deviations = values.iter().try_fold(Decimal::ZERO, |acc, v| {
        let deviation = in_range("values", v.checked_sub(mean))?;
        let squared = in_range("values", deviation.checked_mul(deviation))?;
        in_range("values", acc.checked_add(squared))
    })?;

    let population_variance = squared_deviations / n;
    let (sample_variance, sample_std_dev) = if count > 1 {
        let var = squared_deviations / (n - Decimal::ONE);
        (Some(var), Some(sqrt("values", var)?))
    } else {
        (None, None)
    };

    let min = sorted[0];
    let max = sorted[count - 1];

    Ok(DescriptiveOutput {
        count,
        sum,
        mean,
        median: median(&sorted).unwrap_or(mean),
        modes: modes(values),
        min,
        max,
        range: in_range("values", max.checked_sub(min))?,
        population_variance,
        population_std_dev: sqrt("values", population_variance)?,
        sample_variance,
        sample_std_dev,
    })
}

pub fn calculate_descriptive(
    input: &DescriptiveInput,
) -> CalcHubResult<ComputationOutput<DescriptiveOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    let output = describe(&input.values)?;
    if output.count == 1 {
        warnings.push("Sample statistics need at least two values".to_string());
    }
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Descriptive statistics (population and Bessel-corrected sample)",
        &serde_json::json!({ "count": output.count }),
        warnings,
        elapsed,
        output,
    ))
}
