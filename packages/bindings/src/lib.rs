use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use calchub_core::CalcHubResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Deserialize `input_json`, run the calculator and serialize its envelope.
fn run_json<I, O>(input_json: &str, calc: impl FnOnce(&I) -> CalcHubResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = calc(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

fn parse_decimal(field: &str, value: &str) -> NapiResult<Decimal> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| to_napi_error(format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_loan(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::finance::loan::calculate_loan)
}

#[napi]
pub fn calculate_payoff(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::finance::payoff::calculate_payoff)
}

#[napi]
pub fn calculate_compound_interest(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::finance::compound::calculate_compound_interest)
}

/// Periodic rate for a nominal annual percentage, as a decimal string.
#[napi]
pub fn normalize_rate(annual_rate_percent: String, periods_per_year: u32) -> NapiResult<String> {
    let annual = parse_decimal("annual_rate_percent", &annual_rate_percent)?;
    if periods_per_year == 0 {
        return Err(to_napi_error("periods_per_year must be positive"));
    }
    Ok(calchub_core::finance::rate::normalize_rate(annual, periods_per_year).to_string())
}

/// Level installment for a principal, periodic rate and period count.
#[napi]
pub fn solve_payment(principal: String, periodic_rate: String, periods: u32) -> NapiResult<String> {
    let principal = parse_decimal("principal", &principal)?;
    let rate = parse_decimal("periodic_rate", &periodic_rate)?;
    calchub_core::finance::payment::solve_payment(principal, rate, periods)
        .map(|p| p.to_string())
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Math
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_ratio(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::math::ratio::calculate_ratio)
}

#[napi]
pub fn convert_base(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::math::base_conversion::calculate_base_conversion)
}

#[napi]
pub fn calculate_triangle(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::math::triangle::calculate_triangle)
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[napi]
pub fn descriptive_statistics(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::statistics::descriptive::calculate_descriptive)
}

#[napi]
pub fn two_event_probability(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::statistics::probability::calculate_two_events)
}

#[napi]
pub fn z_score(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::statistics::zscore::calculate_z_score)
}

// ---------------------------------------------------------------------------
// Units and health
// ---------------------------------------------------------------------------

#[napi]
pub fn convert_units(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::units::conversion::calculate_conversion)
}

#[napi]
pub fn calculate_bmi(input_json: String) -> NapiResult<String> {
    run_json(&input_json, calchub_core::health::bmi::calculate_bmi)
}
