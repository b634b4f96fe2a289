use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::CalcHubResult;

/// Pounds per inch² to kg/m²
const IMPERIAL_FACTOR: Decimal = dec!(703);
const HEALTHY_MIN: Decimal = dec!(18.5);
const HEALTHY_MAX: Decimal = dec!(25);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    /// Weight in kilograms, height in centimetres
    #[default]
    Metric,
    /// Weight in pounds, height in inches
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObeseClass1,
    ObeseClass2,
    ObeseClass3,
}

impl BmiCategory {
    /// WHO adult classification
    pub fn from_bmi(bmi: Decimal) -> Self {
        if bmi < HEALTHY_MIN {
            BmiCategory::Underweight
        } else if bmi < HEALTHY_MAX {
            BmiCategory::Normal
        } else if bmi < dec!(30) {
            BmiCategory::Overweight
        } else if bmi < dec!(35) {
            BmiCategory::ObeseClass1
        } else if bmi < dec!(40) {
            BmiCategory::ObeseClass2
        } else {
            BmiCategory::ObeseClass3
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiInput {
    pub weight: Decimal,
    pub height: Decimal,
    #[serde(default)]
    pub system: MeasurementSystem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiOutput {
    pub bmi: Decimal,
    pub category: BmiCategory,
    /// Weight range for BMI 18.5 to 25 at this height, in the input's units
    pub healthy_weight_min: Decimal,
    pub healthy_weight_max: Decimal,
}

pub fn calculate_bmi(input: &BmiInput) -> CalcHubResult<ComputationOutput<BmiOutput>> {
    let start = Instant::now();
    require_positive("weight", input.weight)?;
    require_positive("height", input.height)?;

    // weight = bmi * height_squared / factor, in whichever system was given
    let (height, factor) = match input.system {
        MeasurementSystem::Metric => (input.height / dec!(100), Decimal::ONE),
        MeasurementSystem::Imperial => (input.height, IMPERIAL_FACTOR),
    };
    let height_squared = in_range("height", height.checked_mul(height))?;

    let scaled_weight = in_range("weight", input.weight.checked_mul(factor))?;
    let bmi = in_range("height", scaled_weight.checked_div(height_squared))?.round_dp(1);
    let healthy_weight = |limit: Decimal| {
        in_range("height", (limit / factor).checked_mul(height_squared)).map(|w| w.round_dp(1))
    };
    let output = BmiOutput {
        bmi,
        category: BmiCategory::from_bmi(bmi),
        healthy_weight_min: healthy_weight(HEALTHY_MIN)?,
        healthy_weight_max: healthy_weight(HEALTHY_MAX)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Body Mass Index with WHO adult categories",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcHubError;

    #[test]
    fn test_metric() {
        let out = calculate_bmi(&BmiInput {
            weight: dec!(70),
            height: dec!(175),
            system: MeasurementSystem::Metric,
        })
        .unwrap();
        assert_eq!(out.result.bmi, dec!(22.9));
        assert_eq!(out.result.category, BmiCategory::Normal);
        assert_eq!(out.result.healthy_weight_min, dec!(56.7));
        assert_eq!(out.result.healthy_weight_max, dec!(76.6));
    }

    #[test]
    fn test_imperial() {
        let out = calculate_bmi(&BmiInput {
            weight: dec!(200),
            height: dec!(70),
            system: MeasurementSystem::Imperial,
        })
        .unwrap();
        // 200 * 703 / 4900 = 28.69
        assert_eq!(out.result.bmi, dec!(28.7));
        assert_eq!(out.result.category, BmiCategory::Overweight);
    }

    #[test]
    fn test_category_edges() {
        assert_eq!(BmiCategory::from_bmi(dec!(18.4)), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(dec!(18.5)), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(dec!(30)), BmiCategory::ObeseClass1);
        assert_eq!(BmiCategory::from_bmi(dec!(40)), BmiCategory::ObeseClass3);
    }

    #[test]
    fn test_out_of_range_measurements_rejected() {
        let input = BmiInput {
            weight: dec!(70),
            height: dec!(1000000000000000000),
            system: MeasurementSystem::Imperial,
        };
        assert!(matches!(calculate_bmi(&input), Err(CalcHubError::InvalidInput { .. })));
    }

    #[test]
    fn test_non_positive_rejected() {
        let input = BmiInput {
            weight: dec!(70),
            height: Decimal::ZERO,
            system: MeasurementSystem::Metric,
        };
        assert!(calculate_bmi(&input).is_err());
    }
}
