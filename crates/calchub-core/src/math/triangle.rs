use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::*;
use crate::CalcHubResult;

const RIGHT_ANGLE_TOLERANCE: Decimal = dec!(0.000000001);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideClass {
    Equilateral,
    Isosceles,
    Scalene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleClass {
    Acute,
    Right,
    Obtuse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleInput {
    pub a: Decimal,
    pub b: Decimal,
    pub c: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleOutput {
    pub area: Decimal,
    pub perimeter: Decimal,
    pub semi_perimeter: Decimal,
    pub side_class: SideClass,
    pub angle_class: AngleClass,
    /// Angles opposite a, b and c, in degrees
    pub angles_degrees: [Decimal; 3],
}

/// Heron's formula: `sqrt(s(s-a)(s-b)(s-c))` with `s` the semi-perimeter.
///
/// Evaluated on sides scaled by the longest one, then scaled back by its square,
/// so the four-way product stays small whatever the units.
pub fn heron_area(a: Decimal, b: Decimal, c: Decimal) -> CalcHubResult<Decimal> {
    require_positive("a", a)?;
    require_positive("b", b)?;
    require_positive("c", c)?;
    let longest = a.max(b).max(c);
    let (a, b, c) = (a / longest, b / longest, c / longest);
    if a + b <= c || a + c <= b || b + c <= a {
        return Err(CalcHubError::invalid(
            "c",
            "Sides violate the triangle inequality",
        ));
    }
    let s = (a + b + c) / dec!(2);
    let unit_area = (s * (s - a) * (s - b) * (s - c))
        .sqrt()
        .ok_or_else(|| CalcHubError::invalid("a", "Area undefined for these sides"))?;
    let scale = in_range("a", longest.checked_mul(longest))?;
    in_range("a", unit_area.checked_mul(scale))
}

/// Angle opposite `opposite` from the law of cosines, in degrees.
fn angle_degrees(opposite: Decimal, x: Decimal, y: Decimal) -> CalcHubResult<Decimal> {
    let cos = (x * x + y * y - opposite * opposite) / (dec!(2) * x * y);
    let cos = cos
        .to_f64()
        .ok_or_else(|| CalcHubError::invalid("a", "Angle out of range"))?
        .clamp(-1.0, 1.0);
    Decimal::from_f64(cos.acos().to_degrees())
        .map(|d| d.round_dp(6))
        .ok_or_else(|| CalcHubError::invalid("a", "Angle out of range"))
}

pub fn calculate_triangle(input: &TriangleInput) -> CalcHubResult<ComputationOutput<TriangleOutput>> {
    let start = Instant::now();
    let TriangleInput { a, b, c } = *input;

    let area = heron_area(a, b, c)?;
    let perimeter = in_range("a", a.checked_add(b).and_then(|ab| ab.checked_add(c)))?;

    let side_class = if a == b && b == c {
        SideClass::Equilateral
    } else if a == b || b == c || a == c {
        SideClass::Isosceles
    } else {
        SideClass::Scalene
    };

    let mut sorted = [a, b, c];
    sorted.sort();
    let [x, y, longest] = sorted;
    // compare on the unit scale so squaring cannot overflow
    let (x, y) = (x / longest, y / longest);
    let legs = x * x + y * y;
    let hyp = Decimal::ONE;
    let angle_class = if (hyp - legs).abs() <= RIGHT_ANGLE_TOLERANCE {
        AngleClass::Right
    } else if hyp > legs {
        AngleClass::Obtuse
    } else {
        AngleClass::Acute
    };

    let output = TriangleOutput {
        area,
        perimeter,
        semi_perimeter: perimeter / dec!(2),
        side_class,
        angle_class,
        angles_degrees: [
            angle_degrees(a / longest, b / longest, c / longest)?,
            angle_degrees(b / longest, a / longest, c / longest)?,
            angle_degrees(c / longest, a / longest, b / longest)?,
        ],
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Heron's formula; law of cosines for angles",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}
