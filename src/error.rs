use thiserror::Error;

/// Errors raised by the statistical primitives.
///
/// The differential expression pipeline excludes a probe on any of these. The enrichment
/// pipeline propagates [`StatsError::InvalidParameter`], since impossible overlap counts
/// mean the mapping or foreground set is inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A group does not carry enough valid observations for the requested statistic.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Arguments violate the documented preconditions of a computation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A measurement cell could not be read as a number.
    #[error("missing value: {0:?}")]
    MissingValue(String),
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
