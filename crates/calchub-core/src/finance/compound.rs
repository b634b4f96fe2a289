use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::finance::rate::{effective_annual_rate, normalize_rate, PaymentFrequency};
use crate::types::*;
use crate::CalcHubResult;

const MAX_YEARS: u32 = 100;

/// When in each period the contribution lands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionTiming {
    /// Annuity due: contribution earns interest in the same period
    Beginning,
    #[default]
    End,
}

/// Input for the compound interest / investment growth calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub years: u32,
    #[serde(default)]
    pub compounding: PaymentFrequency,
    #[serde(default)]
    pub periodic_contribution: Money,
    #[serde(default)]
    pub contribution_timing: ContributionTiming,
}

/// Balance snapshot at the end of a year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearEndBalance {
    pub year: u32,
    pub contributions_to_date: Money,
    pub interest_to_date: Money,
    pub balance: Money,
}

/// Output of the compound interest calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestOutput {
    pub final_balance: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
    pub effective_annual_rate: Rate,
    pub yearly: Vec<YearEndBalance>,
}

/// Grow a starting balance plus regular contributions, period by period.
pub fn calculate_compound_interest(
    input: &CompoundInterestInput,
) -> CalcHubResult<ComputationOutput<CompoundInterestOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    require_non_negative("principal", input.principal)?;
    require_non_negative("periodic_contribution", input.periodic_contribution)?;
    if input.principal.is_zero() && input.periodic_contribution.is_zero() {
        return Err(CalcHubError::invalid(
            "principal",
            "Either a starting principal or a periodic contribution is required",
        ));
    }
    if input.annual_rate_percent < Decimal::ZERO || input.annual_rate_percent > dec!(100) {
        return Err(CalcHubError::invalid(
            "annual_rate_percent",
            "Annual rate must be between 0 and 100",
        ));
    }
    if input.years == 0 || input.years > MAX_YEARS {
        return Err(CalcHubError::invalid(
            "years",
            format!("Years must be between 1 and {MAX_YEARS}"),
        ));
    }

    let periods_per_year = input.compounding.periods_per_year();
    let periodic_rate = normalize_rate(input.annual_rate_percent, periods_per_year);

    let mut balance = input.principal;
    let mut contributions = input.principal;
    let mut yearly = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        for _ in 0..periods_per_year {
            if input.contribution_timing == ContributionTiming::Beginning {
                let deposited = balance.checked_add(input.periodic_contribution);
                balance = in_range("annual_rate_percent", deposited)?;
                contributions += input.periodic_contribution;
            }
            let interest = balance.checked_mul(periodic_rate);
            balance = in_range("annual_rate_percent", interest.and_then(|i| balance.checked_add(i)))?;
            if input.contribution_timing == ContributionTiming::End {
                let deposited = balance.checked_add(input.periodic_contribution);
                balance = in_range("annual_rate_percent", deposited)?;
                contributions += input.periodic_contribution;
            }
        }
        yearly.push(YearEndBalance {
            year,
            contributions_to_date: contributions,
            interest_to_date: balance - contributions,
            balance,
        });
    }

    let output = CompoundInterestOutput {
        final_balance: balance,
        total_contributions: contributions,
        total_interest: balance - contributions,
        effective_annual_rate: effective_annual_rate(input.annual_rate_percent, periods_per_year)?,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Periodic compounding with regular contributions",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "years": input.years,
            "compounding": input.compounding.to_string(),
            "periodic_contribution": input.periodic_contribution.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
