use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Percent inputs are named `*_percent`.
pub type Rate = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Reject a negative value for `field`.
pub(crate) fn require_non_negative(field: &str, value: Decimal) -> crate::CalcHubResult<()> {
    if value < Decimal::ZERO {
        return Err(crate::CalcHubError::invalid(field, "Must be zero or greater"));
    }
    Ok(())
}

/// Reject a zero or negative value for `field`.
pub(crate) fn require_positive(field: &str, value: Decimal) -> crate::CalcHubResult<()> {
    if value <= Decimal::ZERO {
        return Err(crate::CalcHubError::invalid(field, "Must be greater than zero"));
    }
    Ok(())
}

/// Unwrap a `checked_*` result, rejecting `field` when the value left Decimal's range.
pub(crate) fn in_range(field: &str, value: Option<Decimal>) -> crate::CalcHubResult<Decimal> {
    value.ok_or_else(|| crate::CalcHubError::invalid(field, "Result exceeds the representable range"))
}
