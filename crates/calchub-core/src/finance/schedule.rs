use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalcHubError;
use crate::finance::rate::PaymentFrequency;
use crate::types::*;
use crate::CalcHubResult;

/// Hard ceiling on emitted records (100 years of monthly periods).
pub const MAX_SIMULATION_PERIODS: u32 = 1200;

/// A balance at or below this is treated as paid off and clamped to zero.
pub const BALANCE_EPSILON: Decimal = dec!(0.005);

/// Whether a period was interest-only accrual or a repayment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    /// Interest accrues onto the balance, nothing is paid
    Grace,
    Payment,
}

/// A single period in the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period_number: u32,
    pub kind: PeriodKind,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Eagerly materialized output of [`simulate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedSchedule {
    pub records: Vec<PeriodRecord>,
    /// Term the payment was sized for; the record count can differ
    pub scheduled_periods: u32,
    /// True when [`MAX_SIMULATION_PERIODS`] truncated the schedule
    pub cap_reached: bool,
}

impl SimulatedSchedule {
    pub fn payment_records(&self) -> impl Iterator<Item = &PeriodRecord> {
        self.records.iter().filter(|r| r.kind == PeriodKind::Payment)
    }

    pub fn final_balance(&self) -> Money {
        self.records
            .last()
            .map(|r| r.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Simulate the loan period by period.
///
/// Grace periods come first and capitalize their interest. Each repayment
/// period then applies `payment + additional_payment`, interest first. The
/// loop ends once the balance is cleared, or at [`MAX_SIMULATION_PERIODS`].
///
/// Returns [`CalcHubError::NonAmortizingPayment`] when the first repayment
/// would not cover the interest accrued that period.
pub fn simulate(
    principal: Money,
    periodic_rate: Rate,
    payment: Money,
    total_periods: u32,
    grace_periods: u32,
    additional_payment: Money,
) -> CalcHubResult<SimulatedSchedule> {
    require_positive("principal", principal)?;
    if periodic_rate < Decimal::ZERO {
        return Err(CalcHubError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    require_non_negative("payment", payment)?;
    require_non_negative("additional_payment", additional_payment)?;

    tracing::debug!(
        %principal,
        %periodic_rate,
        %payment,
        total_periods,
        grace_periods,
        %additional_payment,
        "simulating amortization schedule"
    );

    let expected = grace_periods.saturating_add(total_periods).min(MAX_SIMULATION_PERIODS);
    let mut records = Vec::with_capacity(expected as usize);
    let mut balance = principal;
    let mut period: u32 = 0;
    let mut cap_reached = false;
    let mut total_paid = Decimal::ZERO;

    for _ in 0..grace_periods {
        if period >= MAX_SIMULATION_PERIODS {
            cap_reached = true;
            break;
        }
        period += 1;

        let interest = in_range("principal", balance.checked_mul(periodic_rate))?;
        balance = in_range("principal", balance.checked_add(interest))?;

        records.push(PeriodRecord {
            period_number: period,
            kind: PeriodKind::Grace,
            payment_amount: Decimal::ZERO,
            principal_portion: Decimal::ZERO,
            interest_portion: interest,
            remaining_balance: balance,
            due_date: None,
        });
    }

    if !cap_reached {
        let installment = in_range("additional_payment", payment.checked_add(additional_payment))?;
        let first_interest = in_range("principal", balance.checked_mul(periodic_rate))?;
        if installment <= first_interest {
            return Err(CalcHubError::NonAmortizingPayment {
                payment: installment,
                interest: first_interest,
            });
        }

        while balance > Decimal::ZERO {
            if period >= MAX_SIMULATION_PERIODS {
                cap_reached = true;
                break;
            }
            period += 1;

            let interest = in_range("principal", balance.checked_mul(periodic_rate))?;
            let mut principal_portion = (installment - interest).min(balance);
            if balance - principal_portion <= BALANCE_EPSILON {
                principal_portion = balance;
            }
            balance -= principal_portion;
            // keeps every total rolled up from the records within range
            let payment_amount = in_range("principal", principal_portion.checked_add(interest))?;
            total_paid = in_range("principal", total_paid.checked_add(payment_amount))?;

            records.push(PeriodRecord {
                period_number: period,
                kind: PeriodKind::Payment,
                payment_amount,
                principal_portion,
                interest_portion: interest,
                remaining_balance: balance,
                due_date: None,
            });
        }
    }

    if cap_reached {
        tracing::warn!(
            cap = MAX_SIMULATION_PERIODS,
            %balance,
            "iteration cap reached; schedule truncated"
        );
    }

    Ok(SimulatedSchedule {
        records,
        scheduled_periods: total_periods,
        cap_reached,
    })
}

/// Stamp each record with its due date, one period after `start_date` for the first.
pub fn assign_due_dates(
    records: &mut [PeriodRecord],
    start_date: NaiveDate,
    frequency: PaymentFrequency,
) -> CalcHubResult<()> {
    for record in records.iter_mut() {
        let n = record.period_number;
        let date = match frequency {
            PaymentFrequency::BiWeekly => start_date.checked_add_days(Days::new(14 * n as u64)),
            PaymentFrequency::Weekly => start_date.checked_add_days(Days::new(7 * n as u64)),
            other => {
                let months_per_period = 12 / other.periods_per_year();
                start_date.checked_add_months(Months::new(months_per_period * n))
            }
        };
        record.due_date = Some(date.ok_or_else(|| {
            CalcHubError::invalid("start_date", format!("Period {n} due date out of range"))
        })?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::payment::solve_payment;
    use pretty_assertions::assert_eq;

    fn one_percent_schedule() -> SimulatedSchedule {
        let pmt = solve_payment(dec!(10000), dec!(0.01), 12).unwrap();
        simulate(dec!(10000), dec!(0.01), pmt, 12, 0, Decimal::ZERO).unwrap()
    }

    #[test]
    fn test_schedule_runs_full_term() {
        let sched = one_percent_schedule();
        assert_eq!(sched.records.len(), 12);
        assert!(!sched.cap_reached);
        assert_eq!(sched.final_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_record_invariants_hold() {
        let sched = one_percent_schedule();
        let mut previous = dec!(10000);
        for (i, r) in sched.records.iter().enumerate() {
            assert_eq!(r.period_number, i as u32 + 1);
            assert_eq!(r.principal_portion + r.interest_portion, r.payment_amount);
            assert_eq!(r.remaining_balance, previous - r.principal_portion);
            assert!(r.remaining_balance <= previous);
            previous = r.remaining_balance;
        }
    }

    #[test]
    fn test_first_period_split() {
        let sched = one_percent_schedule();
        let first = &sched.records[0];
        assert_eq!(first.interest_portion, dec!(100));
        assert!((first.principal_portion - dec!(788.49)).abs() < dec!(0.01));
    }

    #[test]
    fn test_grace_period_capitalizes_interest() {
        let sched = simulate(dec!(1000), dec!(0.01), dec!(200), 6, 2, Decimal::ZERO).unwrap();
        assert_eq!(sched.records[0].kind, PeriodKind::Grace);
        assert_eq!(sched.records[0].payment_amount, Decimal::ZERO);
        assert_eq!(sched.records[0].remaining_balance, dec!(1010));
        assert_eq!(sched.records[1].remaining_balance, dec!(1020.10));
        assert_eq!(sched.records[2].kind, PeriodKind::Payment);
        assert_eq!(sched.records[2].interest_portion, dec!(10.2010));
    }

    #[test]
    fn test_no_grace_records_when_grace_is_zero() {
        let sched = one_percent_schedule();
        assert!(sched.records.iter().all(|r| r.kind == PeriodKind::Payment));
    }

    #[test]
    fn test_overpayment_terminates_early() {
        let sched = simulate(dec!(1000), dec!(0.01), dec!(600), 10, 0, Decimal::ZERO).unwrap();
        assert_eq!(sched.records.len(), 2);
        let last = sched.records.last().unwrap();
        assert_eq!(last.remaining_balance, Decimal::ZERO);
        // 1000 + 10 interest - 590 principal = 410 left; final period pays 410 + 4.10
        assert_eq!(last.principal_portion, dec!(410));
        assert_eq!(last.payment_amount, dec!(414.10));
    }

    #[test]
    fn test_payment_equal_to_interest_is_rejected() {
        let err = simulate(dec!(1000), dec!(0.01), dec!(10), 12, 0, Decimal::ZERO).unwrap_err();
        match err {
            CalcHubError::NonAmortizingPayment { payment, interest } => {
                assert_eq!(payment, dec!(10));
                assert_eq!(interest, dec!(10));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_amortizing_check_uses_post_grace_balance() {
        // 10.50 covers 1% of 1000 but not of the capitalized 1061.52
        let err = simulate(dec!(1000), dec!(0.01), dec!(10.50), 12, 6, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, CalcHubError::NonAmortizingPayment { .. }));
    }

    #[test]
    fn test_zero_payment_zero_rate_rejected() {
        let err = simulate(dec!(1000), Decimal::ZERO, Decimal::ZERO, 12, 0, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, CalcHubError::NonAmortizingPayment { .. }));
    }

    #[test]
    fn test_cap_truncates_slow_payoff() {
        // 1.000001 per month against 1% on 100 needs ~1390 periods
        let sched = simulate(dec!(100), dec!(0.01), dec!(1.000001), 12, 0, Decimal::ZERO).unwrap();
        assert!(sched.cap_reached);
        assert_eq!(sched.records.len(), MAX_SIMULATION_PERIODS as usize);
        assert!(sched.final_balance() > Decimal::ZERO);
    }

    #[test]
    fn test_simulate_is_idempotent() {
        assert_eq!(one_percent_schedule(), one_percent_schedule());
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(simulate(dec!(-1), dec!(0.01), dec!(10), 12, 0, Decimal::ZERO).is_err());
        assert!(simulate(dec!(100), dec!(-0.01), dec!(10), 12, 0, Decimal::ZERO).is_err());
        assert!(simulate(dec!(100), dec!(0.01), dec!(10), 12, 0, dec!(-5)).is_err());
    }

    #[test]
    fn test_installment_overflow_is_an_error() {
        let result = simulate(dec!(100), dec!(0.01), Decimal::MAX, 12, 0, Decimal::MAX);
        assert!(matches!(result, Err(CalcHubError::InvalidInput { .. })));
    }

    #[test]
    fn test_total_paid_beyond_range_is_an_error() {
        // the second period's payment pushes the running total past Decimal::MAX
        let result = simulate(Decimal::MAX, dec!(0.5), Decimal::MAX, 2, 0, Decimal::ZERO);
        assert!(matches!(result, Err(CalcHubError::InvalidInput { .. })));
    }

    #[test]
    fn test_grace_capitalization_overflow_is_an_error() {
        let result = simulate(Decimal::MAX, dec!(0.5), Decimal::MAX, 12, 1, Decimal::ZERO);
        assert!(matches!(result, Err(CalcHubError::InvalidInput { .. })));
    }

    #[test]
    fn test_due_dates_monthly() {
        let mut sched = one_percent_schedule();
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assign_due_dates(&mut sched.records, start, PaymentFrequency::Monthly).unwrap();
        assert_eq!(sched.records[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(sched.records[11].due_date, NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_due_dates_biweekly() {
        let mut sched = simulate(dec!(1000), Decimal::ZERO, dec!(500), 2, 0, Decimal::ZERO).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assign_due_dates(&mut sched.records, start, PaymentFrequency::BiWeekly).unwrap();
        assert_eq!(sched.records[1].due_date, NaiveDate::from_ymd_opt(2024, 1, 29));
    }
}
