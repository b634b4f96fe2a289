use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::*;
use crate::CalcHubResult;

/// Two-event probability question.
///
/// Dependent events need `p_b_given_a`; there is no default for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoEventInput {
    pub p_a: Rate,
    pub p_b: Rate,
    #[serde(default)]
    pub dependent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_b_given_a: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoEventOutput {
    pub p_a_and_b: Rate,
    pub p_a_or_b: Rate,
    pub p_not_a: Rate,
    pub p_not_b: Rate,
    pub p_exactly_one: Rate,
    pub p_neither: Rate,
}

fn check_probability(field: &str, p: Rate) -> CalcHubResult<()> {
    if p < Decimal::ZERO || p > Decimal::ONE {
        return Err(CalcHubError::invalid(field, "Probability must be between 0 and 1"));
    }
    Ok(())
}

pub fn two_events(input: &TwoEventInput) -> CalcHubResult<TwoEventOutput> {
    check_probability("p_a", input.p_a)?;
    check_probability("p_b", input.p_b)?;

    let p_a_and_b = if input.dependent {
        let conditional = input.p_b_given_a.ok_or_else(|| {
            CalcHubError::invalid("p_b_given_a", "Dependent events require P(B|A)")
        })?;
        check_probability("p_b_given_a", conditional)?;
        input.p_a * conditional
    } else {
        input.p_a * input.p_b
    };

    if p_a_and_b > input.p_a.min(input.p_b) {
        return Err(CalcHubError::invalid(
            "p_b_given_a",
            "P(A and B) cannot exceed P(B); the conditional is inconsistent",
        ));
    }
    let p_a_or_b = input.p_a + input.p_b - p_a_and_b;
    if p_a_or_b > Decimal::ONE {
        return Err(CalcHubError::invalid(
            "p_b_given_a",
            "P(A or B) exceeds 1; the conditional is inconsistent",
        ));
    }

    Ok(TwoEventOutput {
        p_a_and_b,
        p_a_or_b,
        p_not_a: Decimal::ONE - input.p_a,
        p_not_b: Decimal::ONE - input.p_b,
        p_exactly_one: p_a_or_b - p_a_and_b,
        p_neither: Decimal::ONE - p_a_or_b,
    })
}

pub fn calculate_two_events(input: &TwoEventInput) -> CalcHubResult<ComputationOutput<TwoEventOutput>> {
    let start = Instant::now();
    let output = two_events(input)?;
    let methodology = if input.dependent {
        "Dependent events: P(A∩B) = P(A)·P(B|A)"
    } else {
        "Independent events: P(A∩B) = P(A)·P(B)"
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, output))
}
