use calchub_core::math::base_conversion::{self, BaseConversionInput};
use calchub_core::math::ratio::{self, gcd, simplify_ratio, RatioInput};
use calchub_core::math::triangle::{self, TriangleInput};
use rust_decimal_macros::dec;

// ===========================================================================
// Ratio simplification
// ===========================================================================

#[test]
fn test_simplify_known_ratios() {
    assert_eq!(simplify_ratio(8, 12).unwrap(), (2, 3));
    assert_eq!(simplify_ratio(0, 5).unwrap(), (0, 1));
    assert_eq!(simplify_ratio(1920, 1080).unwrap(), (16, 9));
}

#[test]
fn test_simplified_terms_are_coprime() {
    for (a, b) in [(84, 36), (17, 51), (1000, 250), (-45, 60)] {
        let (x, y) = simplify_ratio(a, b).unwrap();
        assert_eq!(gcd(x, y), 1, "{a}:{b} -> {x}:{y}");
    }
}

#[test]
fn test_ratio_calculator_envelope() {
    let out = ratio::calculate_ratio(&RatioInput { a: 16, b: 24, scale_to: None }).unwrap();
    assert_eq!(out.result.display, "2:3");
    assert_eq!(out.result.gcd, 8);
    assert!(out.warnings.is_empty());
}

// ===========================================================================
// Base conversion
// ===========================================================================

#[test]
fn test_hex_round_trip() {
    let hex = base_conversion::convert_base("255", 10, 16).unwrap();
    assert_eq!(hex.result, "ff");
    let dec = base_conversion::convert_base(&hex.result, 16, 10).unwrap();
    assert_eq!(dec.result, "255");
}

#[test]
fn test_conversion_trace_reads_back_to_result() {
    let out = base_conversion::calculate_base_conversion(&BaseConversionInput {
        value: "2024".into(),
        from_base: 10,
        to_base: 8,
    })
    .unwrap();
    let r = &out.result;
    assert_eq!(r.result, "3750");
    let from_steps: String = r.steps.iter().rev().map(|s| s.digit).collect();
    assert_eq!(from_steps, r.result);
    assert_eq!(r.steps[0].dividend, 2024);
    assert_eq!(r.steps.last().unwrap().quotient, 0);
}

// ===========================================================================
// Triangle
// ===========================================================================

#[test]
fn test_heron_area_scalene() {
    // s = 21, area = sqrt(21*8*7*6) = 84
    let out = triangle::calculate_triangle(&TriangleInput {
        a: dec!(13),
        b: dec!(14),
        c: dec!(15),
    })
    .unwrap();
    assert!((out.result.area - dec!(84)).abs() < dec!(0.000001));
    let angle_sum: rust_decimal::Decimal = out.result.angles_degrees.iter().sum();
    assert!((angle_sum - dec!(180)).abs() < dec!(0.0001));
}
