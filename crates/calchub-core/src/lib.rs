pub mod error;
pub mod types;

#[cfg(feature = "finance")]
pub mod finance;

#[cfg(feature = "math")]
pub mod math;

#[cfg(feature = "statistics")]
pub mod statistics;

#[cfg(feature = "units")]
pub mod units;

#[cfg(feature = "health")]
pub mod health;

pub use error::CalcHubError;
pub use types::*;

/// Standard result type for all CalcHub calculations
pub type CalcHubResult<T> = Result<T, CalcHubError>;
