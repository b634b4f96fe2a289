use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::finance::schedule::{PeriodKind, PeriodRecord};
use crate::types::Money;

/// Totals rolled up from a full schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub periodic_payment_amount: Money,
    pub total_interest: Money,
    /// Original principal plus any capitalized grace interest
    pub total_principal: Money,
    pub total_paid: Money,
    /// Repayment periods actually needed (grace periods excluded)
    pub actual_period_count: u32,
    pub grace_period_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_saved: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods_saved: Option<u32>,
}

/// One year of repayments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub total_paid: Money,
    pub ending_balance: Money,
}

/// Roll payment records into totals. An empty slice yields a zeroed summary.
pub fn summarize(records: &[PeriodRecord], periodic_payment: Money) -> ScheduleSummary {
    let mut summary = ScheduleSummary {
        periodic_payment_amount: periodic_payment,
        ..Default::default()
    };

    for record in records {
        match record.kind {
            PeriodKind::Grace => summary.grace_period_count += 1,
            PeriodKind::Payment => {
                summary.actual_period_count += 1;
                summary.total_interest += record.interest_portion;
                summary.total_principal += record.principal_portion;
                summary.total_paid += record.payment_amount;
            }
        }
    }

    summary
}

/// Group payment records into consecutive blocks of `periods_per_year`.
///
/// The last year may be partial. Grace records are skipped: their interest
/// is already part of the principal repaid later.
pub fn yearly_breakdown(records: &[PeriodRecord], periods_per_year: u32) -> Vec<YearlySummary> {
    if periods_per_year == 0 {
        return Vec::new();
    }

    let payments: Vec<&PeriodRecord> = records
        .iter()
        .filter(|r| r.kind == PeriodKind::Payment)
        .collect();

    payments
        .chunks(periods_per_year as usize)
        .enumerate()
        .map(|(i, chunk)| {
            let principal_paid: Decimal = chunk.iter().map(|r| r.principal_portion).sum();
            let interest_paid: Decimal = chunk.iter().map(|r| r.interest_portion).sum();
            YearlySummary {
                year: i as u32 + 1,
                principal_paid,
                interest_paid,
                total_paid: principal_paid + interest_paid,
                ending_balance: chunk
                    .last()
                    .map(|r| r.remaining_balance)
                    .unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

/// Fill the savings fields of `summary` against a no-extra-payment `baseline`.
pub fn compare_to_baseline(summary: &ScheduleSummary, baseline: &ScheduleSummary) -> ScheduleSummary {
    ScheduleSummary {
        interest_saved: Some(baseline.total_interest - summary.total_interest),
        periods_saved: Some(
            baseline
                .actual_period_count
                .saturating_sub(summary.actual_period_count),
        ),
        ..summary.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::payment::solve_payment;
    use crate::finance::schedule::simulate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_schedule_zeroed() {
        let summary = summarize(&[], Decimal::ZERO);
        assert_eq!(summary, ScheduleSummary::default());
    }

    #[test]
    fn test_totals_add_up() {
        let pmt = solve_payment(dec!(10000), dec!(0.01), 12).unwrap();
        let sched = simulate(dec!(10000), dec!(0.01), pmt, 12, 0, Decimal::ZERO).unwrap();
        let summary = summarize(&sched.records, pmt);
        assert_eq!(summary.actual_period_count, 12);
        assert_eq!(summary.grace_period_count, 0);
        assert!((summary.total_principal - dec!(10000)).abs() < dec!(0.0001));
        assert_eq!(summary.total_paid, summary.total_principal + summary.total_interest);
        // 12 * 888.4879 - 10000 = 661.85
        assert!((summary.total_interest - dec!(661.85)).abs() < dec!(0.01));
    }

    #[test]
    fn test_grace_records_counted_separately() {
        let sched = simulate(dec!(1000), dec!(0.01), dec!(300), 4, 2, Decimal::ZERO).unwrap();
        let summary = summarize(&sched.records, dec!(300));
        assert_eq!(summary.grace_period_count, 2);
        assert_eq!(
            summary.actual_period_count as usize,
            sched.records.len() - 2
        );
        // Capitalized grace interest is repaid as principal
        assert!((summary.total_principal - dec!(1020.10)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_yearly_breakdown_buckets() {
        let pmt = solve_payment(dec!(12000), dec!(0.005), 30).unwrap();
        let sched = simulate(dec!(12000), dec!(0.005), pmt, 30, 0, Decimal::ZERO).unwrap();
        let years = yearly_breakdown(&sched.records, 12);
        assert_eq!(years.len(), 3);
        assert_eq!(years[0].year, 1);
        assert_eq!(years[2].ending_balance, Decimal::ZERO);
        let principal: Decimal = years.iter().map(|y| y.principal_paid).sum();
        assert!((principal - dec!(12000)).abs() < dec!(0.0001));
        assert_eq!(years[0].total_paid, years[0].principal_paid + years[0].interest_paid);
    }

    #[test]
    fn test_yearly_breakdown_zero_frequency() {
        assert!(yearly_breakdown(&[], 0).is_empty());
    }

    #[test]
    fn test_compare_to_baseline() {
        let pmt = solve_payment(dec!(5000), dec!(0.01), 24).unwrap();
        let base = simulate(dec!(5000), dec!(0.01), pmt, 24, 0, Decimal::ZERO).unwrap();
        let extra = simulate(dec!(5000), dec!(0.01), pmt, 24, 0, dec!(100)).unwrap();
        let base_summary = summarize(&base.records, pmt);
        let extra_summary = summarize(&extra.records, pmt);
        let compared = compare_to_baseline(&extra_summary, &base_summary);
        assert!(compared.interest_saved.unwrap() > Decimal::ZERO);
        assert!(compared.periods_saved.unwrap() > 0);
        assert_eq!(compared.total_interest, extra_summary.total_interest);
    }
}
