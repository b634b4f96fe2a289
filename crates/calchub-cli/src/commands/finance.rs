use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use calchub_core::finance::compound::{self, CompoundInterestInput, ContributionTiming};
use calchub_core::finance::loan::{self, LoanParameters};
use calchub_core::finance::payoff::{self, PayoffInput};
use calchub_core::finance::rate::PaymentFrequency;

use super::{load_input, required, CommandResult};

/// Arguments for a loan amortization schedule
#[derive(Args)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate in percent (e.g. 6 for 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Term in payment periods (overrides --years)
    #[arg(long)]
    pub periods: Option<u32>,

    /// Payment frequency: monthly, biweekly, weekly, quarterly, semiannual, annual
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,

    /// Periods of interest-only capitalization before repayment starts
    #[arg(long, default_value = "0")]
    pub grace: u32,

    /// Extra amount paid every period
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Fixed payment to use instead of the solved payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Loan start date (YYYY-MM-DD) for due dates
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Only keep the first N schedule rows in the output
    #[arg(long)]
    pub rows: Option<usize>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a debt payoff plan
#[derive(Args)]
pub struct PayoffArgs {
    /// Outstanding balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Fixed payment per period
    #[arg(long, conflicts_with = "periods")]
    pub payment: Option<Decimal>,

    /// Target number of periods to be debt free
    #[arg(long)]
    pub periods: Option<u32>,

    /// Payment frequency
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,

    /// Extra amount paid every period
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for compound interest growth
#[derive(Args)]
pub struct CompoundArgs {
    /// Starting balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Investment horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Compounding frequency
    #[arg(long, default_value = "monthly")]
    pub compounding: PaymentFrequency,

    /// Contribution added every compounding period
    #[arg(long)]
    pub contribution: Option<Decimal>,

    /// Contributions land at the start of each period
    #[arg(long)]
    pub beginning: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_loan(args: LoanArgs) -> CommandResult {
    let params: LoanParameters = load_input(args.input.as_deref(), || {
        let principal = args.principal.ok_or_else(|| required("principal"))?;
        let rate = args.rate.ok_or_else(|| required("rate"))?;
        let ppy = args.frequency.periods_per_year();
        let term_periods = match (args.periods, args.years) {
            (Some(p), _) => p,
            (None, Some(y)) => y.saturating_mul(ppy),
            (None, None) => return Err("--years or --periods is required (or provide --input)".into()),
        };
        Ok(LoanParameters {
            principal,
            annual_rate_percent: rate,
            term_periods,
            periods_per_year: ppy,
            grace_periods: args.grace,
            additional_payment: args.extra.unwrap_or(Decimal::ZERO),
            payment_override: args.payment,
            start_date: args.start_date,
        })
    })?;

    let mut result = loan::calculate_loan(&params)?;
    if let Some(rows) = args.rows {
        let total = result.result.schedule.len();
        result.result.schedule = result.result.preview(rows).to_vec();
        tracing::debug!(rows, total, "truncated schedule");
    }
    Ok(serde_json::to_value(result)?)
}

pub fn run_payoff(args: PayoffArgs) -> CommandResult {
    let payoff_input: PayoffInput = load_input(args.input.as_deref(), || {
        Ok(PayoffInput {
            balance: args.balance.ok_or_else(|| required("balance"))?,
            annual_rate_percent: args.rate.ok_or_else(|| required("rate"))?,
            periods_per_year: args.frequency.periods_per_year(),
            payment: args.payment,
            desired_periods: args.periods,
            additional_payment: args.extra.unwrap_or(Decimal::ZERO),
        })
    })?;

    let result = payoff::calculate_payoff(&payoff_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compound(args: CompoundArgs) -> CommandResult {
    let compound_input: CompoundInterestInput = load_input(args.input.as_deref(), || {
        Ok(CompoundInterestInput {
            principal: args.principal.ok_or_else(|| required("principal"))?,
            annual_rate_percent: args.rate.ok_or_else(|| required("rate"))?,
            years: args.years.ok_or_else(|| required("years"))?,
            compounding: args.compounding,
            periodic_contribution: args.contribution.unwrap_or(Decimal::ZERO),
            contribution_timing: if args.beginning {
                ContributionTiming::Beginning
            } else {
                ContributionTiming::End
            },
        })
    })?;

    let result = compound::calculate_compound_interest(&compound_input)?;
    Ok(serde_json::to_value(result)?)
}
