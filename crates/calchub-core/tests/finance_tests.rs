use calchub_core::finance::loan::{self, LoanParameters};
use calchub_core::finance::payment::solve_payment;
use calchub_core::finance::rate::{normalize_rate, PaymentFrequency};
use calchub_core::finance::schedule::{simulate, PeriodKind};
use calchub_core::finance::summary::summarize;
use calchub_core::CalcHubError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Known-answer loans
// ===========================================================================

#[test]
fn test_zero_interest_annual_loan() {
    let params = LoanParameters {
        principal: dec!(1000),
        annual_rate_percent: Decimal::ZERO,
        term_periods: 10,
        periods_per_year: 1,
        grace_periods: 0,
        additional_payment: Decimal::ZERO,
        payment_override: None,
        start_date: None,
    };
    let out = loan::calculate_loan(&params).unwrap();
    let s = &out.result.summary;
    assert_eq!(s.periodic_payment_amount, dec!(100.00));
    assert_eq!(s.total_interest, Decimal::ZERO);
    assert_eq!(s.actual_period_count, 10);
    assert_eq!(out.result.yearly.len(), 10);
}

#[test]
fn test_one_percent_monthly_loan() {
    let params = LoanParameters::from_years(dec!(10000), dec!(12), 1, PaymentFrequency::Monthly);
    let out = loan::calculate_loan(&params).unwrap();
    let r = &out.result;
    assert!(
        (r.summary.periodic_payment_amount - dec!(888.49)).abs() < dec!(0.01),
        "Expected payment ~888.49, got {}",
        r.summary.periodic_payment_amount
    );
    assert_eq!(r.schedule.len(), 12);
    assert_eq!(r.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_payment_equal_to_first_interest_is_non_amortizing() {
    let mut params = LoanParameters::from_years(dec!(10000), dec!(12), 1, PaymentFrequency::Monthly);
    params.payment_override = Some(dec!(100));
    match loan::calculate_loan(&params) {
        Err(CalcHubError::NonAmortizingPayment { payment, interest }) => {
            assert_eq!(payment, dec!(100));
            assert_eq!(interest, dec!(100));
        }
        other => panic!("expected NonAmortizingPayment, got {other:?}"),
    }
}

// ===========================================================================
// Engine properties
// ===========================================================================

#[test]
fn test_zero_rate_payment_times_periods_is_principal() {
    for (principal, periods) in [(dec!(1000), 10u32), (dec!(999.99), 7), (dec!(250000), 360)] {
        let pmt = solve_payment(principal, Decimal::ZERO, periods).unwrap();
        let back = pmt * Decimal::from(periods);
        assert!((back - principal).abs() < dec!(0.000001), "{principal} over {periods}: {back}");
    }
}

#[test]
fn test_principal_portions_sum_to_principal() {
    for (principal, annual, years, freq) in [
        (dec!(250000), dec!(6.5), 30, PaymentFrequency::Monthly),
        (dec!(15000), dec!(3.9), 5, PaymentFrequency::BiWeekly),
        (dec!(8000), dec!(24), 2, PaymentFrequency::Weekly),
        (dec!(40000), dec!(7), 10, PaymentFrequency::Quarterly),
    ] {
        let r = normalize_rate(annual, freq.periods_per_year());
        let n = years * freq.periods_per_year();
        let pmt = solve_payment(principal, r, n).unwrap();
        let sched = simulate(principal, r, pmt, n, 0, Decimal::ZERO).unwrap();
        let repaid: Decimal = sched.records.iter().map(|p| p.principal_portion).sum();
        assert!((repaid - principal).abs() < dec!(0.000001), "{principal}: repaid {repaid}");
        assert_eq!(sched.final_balance(), Decimal::ZERO);
        assert_eq!(sched.records.len() as u32, n);
    }
}

#[test]
fn test_simulation_is_deterministic() {
    let r = normalize_rate(dec!(5.25), 12);
    let a = simulate(dec!(30000), r, dec!(600), 60, 3, dec!(25)).unwrap();
    let b = simulate(dec!(30000), r, dec!(600), 60, 3, dec!(25)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_zero_grace_matches_no_grace_loop() {
    let r = normalize_rate(dec!(8), 12);
    let sched = simulate(dec!(5000), r, dec!(250), 24, 0, Decimal::ZERO).unwrap();
    assert!(sched.records.iter().all(|p| p.kind == PeriodKind::Payment));
    assert_eq!(sched.records[0].period_number, 1);
    assert_eq!(sched.records[0].interest_portion, dec!(5000) * r);
}

#[test]
fn test_extra_payment_never_worse_than_baseline() {
    let r = normalize_rate(dec!(4.5), 12);
    let pmt = solve_payment(dec!(200000), r, 360).unwrap();
    let base = summarize(&simulate(dec!(200000), r, pmt, 360, 0, Decimal::ZERO).unwrap().records, pmt);
    for extra in [dec!(0.01), dec!(50), dec!(500), dec!(5000)] {
        let s = summarize(&simulate(dec!(200000), r, pmt, 360, 0, extra).unwrap().records, pmt);
        assert!(s.actual_period_count <= base.actual_period_count);
        assert!(s.total_interest <= base.total_interest);
    }
}

#[test]
fn test_mortgage_with_extra_payment_savings() {
    let mut params = LoanParameters::from_years(dec!(300000), dec!(6), 30, PaymentFrequency::Monthly);
    params.additional_payment = dec!(300);
    let out = loan::calculate_loan(&params).unwrap();
    let s = &out.result.summary;
    // 1798.65 + 300 pays a 30-year loan off in roughly 21 years
    assert!(s.actual_period_count > 240 && s.actual_period_count < 270, "{}", s.actual_period_count);
    assert!(s.interest_saved.unwrap() > dec!(100000));
    assert_eq!(s.periods_saved.unwrap(), 360 - s.actual_period_count);
}

#[test]
fn test_student_loan_with_grace_period() {
    let mut params = LoanParameters::from_years(dec!(30000), dec!(5), 10, PaymentFrequency::Monthly);
    params.grace_periods = 6;
    let out = loan::calculate_loan(&params).unwrap();
    let r = &out.result;
    assert_eq!(r.summary.grace_period_count, 6);
    assert_eq!(r.summary.actual_period_count, 120);
    // balance grows through the grace months
    assert!(r.schedule[5].remaining_balance > dec!(30000));
    assert!(r.summary.total_principal > dec!(30000));
    // yearly view only buckets repayments
    assert_eq!(r.yearly.len(), 10);
}
