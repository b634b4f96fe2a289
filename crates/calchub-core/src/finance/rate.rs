use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcHubError;
use crate::types::Rate;
use crate::CalcHubResult;

/// How often payments are made (and interest compounds) in a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    #[default]
    Monthly,
    BiWeekly,
    Weekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly => 26,
            PaymentFrequency::Weekly => 52,
        }
    }

    /// Map a raw periods-per-year count back onto a supported frequency.
    pub fn from_periods_per_year(periods: u32) -> CalcHubResult<Self> {
        match periods {
            1 => Ok(PaymentFrequency::Annual),
            2 => Ok(PaymentFrequency::SemiAnnual),
            4 => Ok(PaymentFrequency::Quarterly),
            12 => Ok(PaymentFrequency::Monthly),
            26 => Ok(PaymentFrequency::BiWeekly),
            52 => Ok(PaymentFrequency::Weekly),
            other => Err(CalcHubError::invalid(
                "periods_per_year",
                format!("Unsupported frequency {other}; expected 1, 2, 4, 12, 26 or 52"),
            )),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentFrequency::Annual => "Annual",
            PaymentFrequency::SemiAnnual => "Semi-Annual",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::BiWeekly => "Bi-Weekly",
            PaymentFrequency::Weekly => "Weekly",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PaymentFrequency {
    type Err = CalcHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "annual" | "annually" | "yearly" => Ok(PaymentFrequency::Annual),
            "semiannual" | "semiannually" => Ok(PaymentFrequency::SemiAnnual),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "biweekly" | "fortnightly" => Ok(PaymentFrequency::BiWeekly),
            "weekly" => Ok(PaymentFrequency::Weekly),
            other => other
                .parse::<u32>()
                .map_err(|_| CalcHubError::invalid("frequency", format!("Unknown frequency '{s}'")))
                .and_then(PaymentFrequency::from_periods_per_year),
        }
    }
}

/// Per-period rate from an annual percentage: `(annual% / 100) / periods_per_year`.
///
/// A zero `periods_per_year` yields a zero rate; callers validate the
/// frequency before they get here.
pub fn normalize_rate(annual_rate_percent: Decimal, periods_per_year: u32) -> Rate {
    if periods_per_year == 0 {
        return Decimal::ZERO;
    }
    annual_rate_percent / dec!(100) / Decimal::from(periods_per_year)
}

/// Effective annual rate (APY) implied by compounding `periods_per_year` times.
pub fn effective_annual_rate(annual_rate_percent: Decimal, periods_per_year: u32) -> CalcHubResult<Rate> {
    let periodic = normalize_rate(annual_rate_percent, periods_per_year);
    if periodic.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let growth = (Decimal::ONE + periodic)
        .checked_powi(periods_per_year as i64)
        .ok_or_else(|| CalcHubError::invalid("annual_rate_percent", "Rate too large to compound"))?;
    Ok(growth - Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_monthly() {
        assert_eq!(normalize_rate(dec!(12), 12), dec!(0.01));
    }

    #[test]
    fn test_normalize_zero_rate() {
        assert_eq!(normalize_rate(Decimal::ZERO, 52), Decimal::ZERO);
    }

    #[test]
    fn test_effective_annual_rate_monthly() {
        // 12% nominal compounded monthly => 12.6825%
        let ear = effective_annual_rate(dec!(12), 12).unwrap();
        assert!((ear - dec!(0.126825)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_effective_annual_rate_annual_is_nominal() {
        assert_eq!(effective_annual_rate(dec!(5), 1).unwrap(), dec!(0.05));
    }

    #[test]
    fn test_frequency_round_trip() {
        for freq in [
            PaymentFrequency::Annual,
            PaymentFrequency::SemiAnnual,
            PaymentFrequency::Quarterly,
            PaymentFrequency::Monthly,
            PaymentFrequency::BiWeekly,
            PaymentFrequency::Weekly,
        ] {
            let back = PaymentFrequency::from_periods_per_year(freq.periods_per_year()).unwrap();
            assert_eq!(back, freq);
        }
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!("Bi-Weekly".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::BiWeekly);
        assert_eq!("semi_annual".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::SemiAnnual);
        assert_eq!("4".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Quarterly);
        assert!("daily".parse::<PaymentFrequency>().is_err());
    }

    #[test]
    fn test_unsupported_frequency() {
        assert!(PaymentFrequency::from_periods_per_year(3).is_err());
    }
}
