use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::finance::payment::solve_payment;
use crate::finance::rate::{normalize_rate, PaymentFrequency};
use crate::finance::schedule::{assign_due_dates, simulate, PeriodRecord, MAX_SIMULATION_PERIODS};
use crate::finance::summary::{compare_to_baseline, summarize, yearly_breakdown, ScheduleSummary, YearlySummary};
use crate::types::*;
use crate::CalcHubResult;

/// Validated loan terms shared by the loan, mortgage and student-loan calculators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub term_periods: u32,
    pub periods_per_year: u32,
    #[serde(default)]
    pub grace_periods: u32,
    #[serde(default)]
    pub additional_payment: Money,
    /// Fixed payment to use instead of the solved annuity payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_override: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl LoanParameters {
    /// Build parameters from a term in whole years.
    pub fn from_years(
        principal: Money,
        annual_rate_percent: Decimal,
        years: u32,
        frequency: PaymentFrequency,
    ) -> Self {
        let periods_per_year = frequency.periods_per_year();
        LoanParameters {
            principal,
            annual_rate_percent,
            term_periods: years.saturating_mul(periods_per_year),
            periods_per_year,
            grace_periods: 0,
            additional_payment: Decimal::ZERO,
            payment_override: None,
            start_date: None,
        }
    }

    pub fn validate(&self) -> CalcHubResult<PaymentFrequency> {
        require_positive("principal", self.principal)?;
        if self.annual_rate_percent < Decimal::ZERO || self.annual_rate_percent > dec!(100) {
            return Err(CalcHubError::invalid(
                "annual_rate_percent",
                "Annual rate must be between 0 and 100",
            ));
        }
        if self.term_periods == 0 {
            return Err(CalcHubError::invalid("term_periods", "Term must be at least 1 period"));
        }
        if self.term_periods > MAX_SIMULATION_PERIODS {
            return Err(CalcHubError::invalid(
                "term_periods",
                format!("Term cannot exceed {MAX_SIMULATION_PERIODS} periods"),
            ));
        }
        if self.grace_periods.saturating_add(self.term_periods) > MAX_SIMULATION_PERIODS {
            return Err(CalcHubError::invalid(
                "grace_periods",
                format!("Grace and repayment periods together cannot exceed {MAX_SIMULATION_PERIODS}"),
            ));
        }
        require_non_negative("additional_payment", self.additional_payment)?;
        if let Some(p) = self.payment_override {
            require_positive("payment_override", p)?;
        }
        PaymentFrequency::from_periods_per_year(self.periods_per_year)
    }
}

/// Output of the loan calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOutput {
    pub periodic_rate: Rate,
    pub frequency: PaymentFrequency,
    pub summary: ScheduleSummary,
    pub yearly: Vec<YearlySummary>,
    pub schedule: Vec<PeriodRecord>,
    pub cap_reached: bool,
}

impl LoanOutput {
    /// The first `n` rows of the schedule, for truncated displays.
    pub fn preview(&self, n: usize) -> &[PeriodRecord] {
        &self.schedule[..n.min(self.schedule.len())]
    }
}

/// Build a full amortization schedule with totals, a yearly breakdown and,
/// when an extra payment is set, the savings against paying the minimum.
pub fn calculate_loan(params: &LoanParameters) -> CalcHubResult<ComputationOutput<LoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let frequency = params.validate()?;
    let periodic_rate = normalize_rate(params.annual_rate_percent, params.periods_per_year);
    tracing::debug!(
        principal = %params.principal,
        %periodic_rate,
        term_periods = params.term_periods,
        grace_periods = params.grace_periods,
        "calculating loan"
    );

    // Size the payment on what is owed once grace interest has been capitalized
    let repayment_balance = if params.grace_periods > 0 && !periodic_rate.is_zero() {
        let growth = (Decimal::ONE + periodic_rate)
            .checked_powi(params.grace_periods as i64)
            .ok_or_else(|| CalcHubError::invalid("grace_periods", "Grace period too long to compound"))?;
        in_range("grace_periods", params.principal.checked_mul(growth))?
    } else {
        params.principal
    };
    let solved = solve_payment(repayment_balance, periodic_rate, params.term_periods)?;

    let payment = match params.payment_override {
        Some(p) => {
            if p < solved {
                warnings.push(format!(
                    "Payment {p} is below the {solved:.2} needed to repay within the term; payoff takes longer"
                ));
            }
            p
        }
        None => solved,
    };

    let mut sched = simulate(
        params.principal,
        periodic_rate,
        payment,
        params.term_periods,
        params.grace_periods,
        params.additional_payment,
    )?;

    if sched.cap_reached {
        warnings.push(format!(
            "Schedule truncated at {MAX_SIMULATION_PERIODS} periods; balance of {:.2} remains",
            sched.final_balance()
        ));
    }

    if let Some(start_date) = params.start_date {
        assign_due_dates(&mut sched.records, start_date, frequency)?;
    }

    let mut summary = summarize(&sched.records, payment);
    if !sched.cap_reached && summary.actual_period_count < params.term_periods {
        warnings.push(format!(
            "Loan is repaid in {} of {} scheduled periods",
            summary.actual_period_count, params.term_periods
        ));
    }

    if params.additional_payment > Decimal::ZERO {
        let baseline = simulate(
            params.principal,
            periodic_rate,
            payment,
            params.term_periods,
            params.grace_periods,
            Decimal::ZERO,
        )?;
        summary = compare_to_baseline(&summary, &summarize(&baseline.records, payment));
    }

    let yearly = yearly_breakdown(&sched.records, params.periods_per_year);

    let output = LoanOutput {
        periodic_rate,
        frequency,
        summary,
        yearly,
        schedule: sched.records,
        cap_reached: sched.cap_reached,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment amortization (annuity formula, period-by-period simulation)",
        &serde_json::json!({
            "principal": params.principal.to_string(),
            "annual_rate_percent": params.annual_rate_percent.to_string(),
            "term_periods": params.term_periods,
            "frequency": frequency.to_string(),
            "grace_periods": params.grace_periods,
            "additional_payment": params.additional_payment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
