use thiserror::Error;

/// Errors from validating constructors and code conversions.
///
/// The annuity formulas themselves never fail; they report degenerate
/// input through sentinel values (`0.0`, `NaN`).
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("unknown day-count basis code {0}")]
    UnknownBasis(u8),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        Error::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
