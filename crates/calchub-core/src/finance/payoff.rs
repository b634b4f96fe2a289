use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::finance::payment::{periods_to_payoff, solve_required_payment};
use crate::finance::rate::{normalize_rate, PaymentFrequency};
use crate::finance::schedule::{simulate, PeriodRecord, MAX_SIMULATION_PERIODS};
use crate::finance::summary::summarize;
use crate::types::*;
use crate::CalcHubResult;

fn default_periods_per_year() -> u32 {
    12
}

/// Input for a credit-card or student-loan payoff plan.
///
/// Exactly one of `payment` and `desired_periods` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffInput {
    pub balance: Money,
    pub annual_rate_percent: Decimal,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_periods: Option<u32>,
    #[serde(default)]
    pub additional_payment: Money,
}

/// Output for a payoff plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffOutput {
    pub payment: Money,
    pub periods_to_payoff: u32,
    pub years_to_payoff: Decimal,
    pub total_interest: Money,
    pub total_paid: Money,
    pub schedule: Vec<PeriodRecord>,
}

/// Solve a payoff plan either way round: the payment needed to be debt-free
/// within a horizon, or how long a given payment takes.
pub fn calculate_payoff(input: &PayoffInput) -> CalcHubResult<ComputationOutput<PayoffOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_positive("balance", input.balance)?;
    if input.annual_rate_percent < Decimal::ZERO || input.annual_rate_percent > dec!(100) {
        return Err(CalcHubError::invalid(
            "annual_rate_percent",
            "Annual rate must be between 0 and 100",
        ));
    }
    require_non_negative("additional_payment", input.additional_payment)?;
    let frequency = PaymentFrequency::from_periods_per_year(input.periods_per_year)?;
    let periodic_rate = normalize_rate(input.annual_rate_percent, input.periods_per_year);
    tracing::debug!(balance = %input.balance, %periodic_rate, ?frequency, "calculating payoff plan");

    let (payment, method) = match (input.payment, input.desired_periods) {
        (Some(_), Some(_)) => {
            return Err(CalcHubError::invalid(
                "payment",
                "Provide either payment or desired_periods, not both",
            ))
        }
        (None, None) => {
            return Err(CalcHubError::invalid(
                "payment",
                "Either payment or desired_periods is required",
            ))
        }
        (Some(p), None) => {
            require_positive("payment", p)?;
            (p, "Payoff horizon for a fixed payment")
        }
        (None, Some(n)) => {
            if n == 0 || n > MAX_SIMULATION_PERIODS {
                return Err(CalcHubError::invalid(
                    "desired_periods",
                    format!("Must be between 1 and {MAX_SIMULATION_PERIODS}"),
                ));
            }
            (
                solve_required_payment(input.balance, periodic_rate, n)?,
                "Required payment for a target payoff horizon (annuity formula)",
            )
        }
    };

    let installment = in_range("additional_payment", payment.checked_add(input.additional_payment))?;
    let estimate = periods_to_payoff(input.balance, periodic_rate, installment)?;
    if estimate > MAX_SIMULATION_PERIODS {
        warnings.push(format!(
            "Payoff needs about {estimate} periods; schedule stops at {MAX_SIMULATION_PERIODS}"
        ));
    }

    let sched = simulate(
        input.balance,
        periodic_rate,
        payment,
        input.desired_periods.unwrap_or(estimate),
        0,
        input.additional_payment,
    )?;
    let summary = summarize(&sched.records, payment);

    let output = PayoffOutput {
        payment,
        periods_to_payoff: summary.actual_period_count,
        years_to_payoff: (Decimal::from(summary.actual_period_count)
            / Decimal::from(input.periods_per_year))
        .round_dp(2),
        total_interest: summary.total_interest,
        total_paid: summary.total_paid,
        schedule: sched.records,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        method,
        &serde_json::json!({
            "balance": input.balance.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "frequency": frequency.to_string(),
            "additional_payment": input.additional_payment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(payment: Option<Decimal>, desired: Option<u32>) -> PayoffInput {
        PayoffInput {
            balance: dec!(5000),
            annual_rate_percent: dec!(18),
            periods_per_year: 12,
            payment,
            desired_periods: desired,
            additional_payment: Decimal::ZERO,
        }
    }

    #[test]
    fn test_required_payment_for_horizon() {
        let out = calculate_payoff(&card(None, Some(24))).unwrap();
        let r = &out.result;
        // 5000 at 1.5%/month over 24 months => 249.62
        assert!((r.payment - dec!(249.62)).abs() < dec!(0.01), "got {}", r.payment);
        assert_eq!(r.periods_to_payoff, 24);
        assert_eq!(r.years_to_payoff, dec!(2));
    }

    #[test]
    fn test_horizon_for_fixed_payment() {
        let out = calculate_payoff(&card(Some(dec!(200)), None)).unwrap();
        let r = &out.result;
        // -ln(1 - 75/200) / ln(1.015) = 31.57 => 32 months
        assert_eq!(r.periods_to_payoff, 32);
        assert!(r.total_interest > Decimal::ZERO);
        assert_eq!(r.total_paid, dec!(5000) + r.total_interest);
    }

    #[test]
    fn test_minimum_payment_trap_rejected() {
        // 75 is exactly the first month's interest
        let err = calculate_payoff(&card(Some(dec!(75)), None)).unwrap_err();
        assert!(matches!(err, CalcHubError::NonAmortizingPayment { .. }));
    }

    #[test]
    fn test_both_or_neither_rejected() {
        assert!(calculate_payoff(&card(Some(dec!(200)), Some(12))).is_err());
        assert!(calculate_payoff(&card(None, None)).is_err());
    }

    #[test]
    fn test_slow_payment_warns_about_cap() {
        let out = calculate_payoff(&card(Some(dec!(75.000001)), None)).unwrap();
        assert!(!out.warnings.is_empty());
        assert_eq!(out.result.periods_to_payoff, MAX_SIMULATION_PERIODS);
    }
}
