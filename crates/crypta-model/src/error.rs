use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("cryptarithm cannot be empty")]
    EmptyCryptarithm,
    #[error("arithmetic base must be within 2..=36, got {0}")]
    InvalidBase(u32),
    #[error("either provide words list OR countryCode+langCode+lowerBound+upperBound")]
    MissingWordSource,
    #[error("doubly-true generation requires countryCode+langCode+lowerBound+upperBound")]
    MissingDoublyTrueBounds,
    #[error("invalid range: {field} lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange {
        field: &'static str,
        lower: u32,
        upper: u32,
    },
    #[error("unknown {field}: '{value}'")]
    UnknownValue { field: &'static str, value: String },
}
