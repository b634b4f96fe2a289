use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcHubError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Non-amortizing payment: payment {payment} does not exceed accruing interest {interest}")]
    NonAmortizingPayment { payment: Decimal, interest: Decimal },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CalcHubError {
    /// Shorthand for the common field-level rejection.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CalcHubError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CalcHubError {
    fn from(e: serde_json::Error) -> Self {
        CalcHubError::SerializationError(e.to_string())
    }
}
