use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::CalcHubError;
use crate::types::{Money, Rate};
use crate::CalcHubResult;

/// Fixed periodic payment that fully amortizes `principal` over `total_periods`.
///
/// A zero rate falls back to the linear `principal / total_periods` payment.
pub fn solve_payment(principal: Money, periodic_rate: Rate, total_periods: u32) -> CalcHubResult<Money> {
    if total_periods == 0 {
        return Err(CalcHubError::invalid(
            "total_periods",
            "Number of periods must be > 0",
        ));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(CalcHubError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(total_periods));
    }

    let one_plus_r = Decimal::ONE + periodic_rate;
    match one_plus_r.checked_powi(total_periods as i64) {
        Some(factor) => {
            let denominator = factor - Decimal::ONE;
            if denominator.is_zero() {
                return Err(CalcHubError::DivisionByZero {
                    context: "annuity factor".into(),
                });
            }
            Ok(principal * periodic_rate * (factor / denominator))
        }
        // (1+r)^n beyond Decimal range: factor / (factor - 1) is 1 at 28 digits.
        None => Ok(principal * periodic_rate),
    }
}

/// Payment required to clear `principal` within `desired_periods`.
///
/// This is the annuity formula read the other way round: the target payoff
/// horizon plays the role of the term.
pub fn solve_required_payment(
    principal: Money,
    periodic_rate: Rate,
    desired_periods: u32,
) -> CalcHubResult<Money> {
    solve_payment(principal, periodic_rate, desired_periods)
}

/// Number of whole periods a fixed `payment` needs to clear `balance`.
///
/// Closed form: `n = -ln(1 - r*B/p) / ln(1 + r)`, rounded up.
pub fn periods_to_payoff(balance: Money, periodic_rate: Rate, payment: Money) -> CalcHubResult<u32> {
    if balance <= Decimal::ZERO {
        return Ok(0);
    }
    if periodic_rate < Decimal::ZERO {
        return Err(CalcHubError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }

    let interest = balance * periodic_rate;
    if payment <= interest {
        return Err(CalcHubError::NonAmortizingPayment { payment, interest });
    }

    let periods = if periodic_rate.is_zero() {
        (balance / payment).ceil()
    } else {
        let numerator = (Decimal::ONE - interest / payment)
            .checked_ln()
            .ok_or_else(|| CalcHubError::invalid("payment", "Payment ratio outside log domain"))?;
        let denominator = (Decimal::ONE + periodic_rate)
            .checked_ln()
            .ok_or_else(|| CalcHubError::invalid("periodic_rate", "Rate outside log domain"))?;
        if denominator.is_zero() {
            return Err(CalcHubError::DivisionByZero {
                context: "periods to payoff".into(),
            });
        }
        // Trim log noise so exact horizons don't round up an extra period.
        (-numerator / denominator).round_dp(6).ceil()
    };

    periods
        .to_u32()
        .ok_or_else(|| CalcHubError::invalid("payment", "Payoff horizon out of range"))
}
