use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::*;
use crate::CalcHubResult;

const KELVIN_OFFSET: Decimal = dec!(273.15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    Length,
    Mass,
    Temperature,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    // length, base metre
    Millimeter,
    Centimeter,
    Meter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
    // mass, base kilogram
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Stone,
    // temperature
    Celsius,
    Fahrenheit,
    Kelvin,
    // volume, base litre (US customary)
    Milliliter,
    Liter,
    FluidOunce,
    Cup,
    Pint,
    Quart,
    Gallon,
}

impl Unit {
    pub fn category(&self) -> UnitCategory {
        use Unit::*;
        match self {
            Millimeter | Centimeter | Meter | Kilometer | Inch | Foot | Yard | Mile => {
                UnitCategory::Length
            }
            Milligram | Gram | Kilogram | Ounce | Pound | Stone => UnitCategory::Mass,
            Celsius | Fahrenheit | Kelvin => UnitCategory::Temperature,
            Milliliter | Liter | FluidOunce | Cup | Pint | Quart | Gallon => UnitCategory::Volume,
        }
    }

    /// Multiplier into the category's base unit. None for temperatures.
    fn to_base(self) -> Option<Decimal> {
        use Unit::*;
        let factor = match self {
            Millimeter => dec!(0.001),
            Centimeter => dec!(0.01),
            Meter => Decimal::ONE,
            Kilometer => dec!(1000),
            Inch => dec!(0.0254),
            Foot => dec!(0.3048),
            Yard => dec!(0.9144),
            Mile => dec!(1609.344),
            Milligram => dec!(0.000001),
            Gram => dec!(0.001),
            Kilogram => Decimal::ONE,
            Ounce => dec!(0.028349523125),
            Pound => dec!(0.45359237),
            Stone => dec!(6.35029318),
            Milliliter => dec!(0.001),
            Liter => Decimal::ONE,
            FluidOunce => dec!(0.0295735295625),
            Cup => dec!(0.2365882365),
            Pint => dec!(0.473176473),
            Quart => dec!(0.946352946),
            Gallon => dec!(3.785411784),
            Celsius | Fahrenheit | Kelvin => return None,
        };
        Some(factor)
    }

    pub fn symbol(&self) -> &'static str {
        use Unit::*;
        match self {
            Millimeter => "mm",
            Centimeter => "cm",
            Meter => "m",
            Kilometer => "km",
            Inch => "in",
            Foot => "ft",
            Yard => "yd",
            Mile => "mi",
            Milligram => "mg",
            Gram => "g",
            Kilogram => "kg",
            Ounce => "oz",
            Pound => "lb",
            Stone => "st",
            Celsius => "°C",
            Fahrenheit => "°F",
            Kelvin => "K",
            Milliliter => "ml",
            Liter => "l",
            FluidOunce => "fl oz",
            Cup => "cup",
            Pint => "pt",
            Quart => "qt",
            Gallon => "gal",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Unit {
    type Err = CalcHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Unit::*;
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimetre" => Millimeter,
            "cm" | "centimeter" | "centimetre" => Centimeter,
            "m" | "meter" | "metre" => Meter,
            "km" | "kilometer" | "kilometre" => Kilometer,
            "in" | "inch" => Inch,
            "ft" | "foot" | "feet" => Foot,
            "yd" | "yard" => Yard,
            "mi" | "mile" => Mile,
            "mg" | "milligram" => Milligram,
            "g" | "gram" => Gram,
            "kg" | "kilogram" => Kilogram,
            "oz" | "ounce" => Ounce,
            "lb" | "lbs" | "pound" => Pound,
            "st" | "stone" => Stone,
            "c" | "celsius" => Celsius,
            "f" | "fahrenheit" => Fahrenheit,
            "k" | "kelvin" => Kelvin,
            "ml" | "milliliter" | "millilitre" => Milliliter,
            "l" | "liter" | "litre" => Liter,
            "floz" | "fl_oz" | "fluid_ounce" => FluidOunce,
            "cup" => Cup,
            "pt" | "pint" => Pint,
            "qt" | "quart" => Quart,
            "gal" | "gallon" => Gallon,
            other => {
                return Err(CalcHubError::invalid("unit", format!("Unknown unit '{other}'")))
            }
        };
        Ok(unit)
    }
}

fn to_kelvin(value: Decimal, from: Unit) -> CalcHubResult<Decimal> {
    let kelvin = match from {
        Unit::Celsius => value.checked_add(KELVIN_OFFSET),
        Unit::Fahrenheit => value
            .checked_sub(dec!(32))
            .and_then(|v| v.checked_mul(dec!(5)))
            .and_then(|v| (v / dec!(9)).checked_add(KELVIN_OFFSET)),
        _ => Some(value),
    };
    in_range("value", kelvin)
}

fn from_kelvin(kelvin: Decimal, to: Unit) -> CalcHubResult<Decimal> {
    let converted = match to {
        Unit::Celsius => Some(kelvin - KELVIN_OFFSET),
        Unit::Fahrenheit => (kelvin - KELVIN_OFFSET)
            .checked_mul(dec!(9))
            .and_then(|v| (v / dec!(5)).checked_add(dec!(32))),
        _ => Some(kelvin),
    };
    in_range("value", converted)
}

/// Convert `value` between two units of the same category.
pub fn convert(value: Decimal, from: Unit, to: Unit) -> CalcHubResult<Decimal> {
    if from.category() != to.category() {
        return Err(CalcHubError::invalid(
            "to",
            format!("Cannot convert {from} to {to}: different quantities"),
        ));
    }

    match (from.to_base(), to.to_base()) {
        (Some(f), Some(t)) => {
            let in_base = in_range("value", value.checked_mul(f))?;
            in_range("value", in_base.checked_div(t))
        }
        _ => {
            let kelvin = to_kelvin(value, from)?;
            if kelvin < Decimal::ZERO {
                return Err(CalcHubError::invalid("value", "Temperature below absolute zero"));
            }
            from_kelvin(kelvin, to)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionInput {
    pub value: Decimal,
    pub from: Unit,
    pub to: Unit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    pub category: UnitCategory,
    pub value: Decimal,
    pub from: Unit,
    pub converted: Decimal,
    pub to: Unit,
    pub display: String,
}

pub fn calculate_conversion(input: &ConversionInput) -> CalcHubResult<ComputationOutput<ConversionOutput>> {
    let start = Instant::now();
    let converted = convert(input.value, input.from, input.to)?;
    let output = ConversionOutput {
        category: input.from.category(),
        value: input.value,
        from: input.from,
        converted,
        to: input.to,
        display: format!(
            "{} {} = {} {}",
            input.value,
            input.from,
            converted.round_dp(6).normalize(),
            input.to
        ),
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Linear factor through the base unit; affine for temperature",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        assert_eq!(convert(dec!(1), Unit::Mile, Unit::Kilometer).unwrap(), dec!(1.609344));
        assert_eq!(convert(dec!(12), Unit::Inch, Unit::Foot).unwrap(), dec!(1));
    }

    #[test]
    fn test_mass() {
        let kg = convert(dec!(1), Unit::Pound, Unit::Kilogram).unwrap();
        assert_eq!(kg, dec!(0.45359237));
        assert_eq!(convert(dec!(1), Unit::Stone, Unit::Pound).unwrap(), dec!(14));
    }

    #[test]
    fn test_volume() {
        assert_eq!(convert(dec!(1), Unit::Gallon, Unit::Quart).unwrap(), dec!(4));
    }

    #[test]
    fn test_temperature() {
        assert_eq!(convert(dec!(100), Unit::Celsius, Unit::Fahrenheit).unwrap(), dec!(212));
        assert_eq!(convert(dec!(0), Unit::Celsius, Unit::Kelvin).unwrap(), dec!(273.15));
        let c = convert(dec!(98.6), Unit::Fahrenheit, Unit::Celsius).unwrap();
        assert!((c - dec!(37)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_below_absolute_zero() {
        assert!(convert(dec!(-300), Unit::Celsius, Unit::Kelvin).is_err());
    }

    #[test]
    fn test_huge_value_is_an_error() {
        let result = convert(dec!(70000000000000000000000000000), Unit::Mile, Unit::Millimeter);
        assert!(matches!(result, Err(CalcHubError::InvalidInput { .. })));
        let result = convert(dec!(70000000000000000000000000000), Unit::Kelvin, Unit::Fahrenheit);
        assert!(matches!(result, Err(CalcHubError::InvalidInput { .. })));
    }

    #[test]
    fn test_cross_category_rejected() {
        assert!(convert(dec!(1), Unit::Meter, Unit::Kilogram).is_err());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("KM".parse::<Unit>().unwrap(), Unit::Kilometer);
        assert_eq!("lbs".parse::<Unit>().unwrap(), Unit::Pound);
        assert!("parsec".parse::<Unit>().is_err());
    }
}
