//! Statistical building blocks shared by the pipelines: group summaries, effect sizes,
//! significance tests, multiple testing correction and ranking.

use single_utilities::traits::FloatOps;

pub mod correction;
pub mod effect;
pub mod inference;
pub mod rank;
pub mod summary;

pub mod utils;

pub use inference::SignificanceTest;
pub use summary::SummaryStats;

/// Statistic and raw p-value of one test, plus the extras a parametric test can report.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult<T> {
    /// t for the Student test, the observed overlap k for the hypergeometric test
    pub statistic: T,
    /// Uncorrected p-value
    pub p_value: T,
    pub degrees_of_freedom: Option<T>,
    /// Standard error of the difference in means
    pub standard_error: Option<T>,
}

impl<T> TestResult<T>
where
    T: FloatOps,
{
    pub fn new(statistic: T, p_value: T) -> Self {
        TestResult {
            statistic,
            p_value,
            degrees_of_freedom: None,
            standard_error: None,
        }
    }

    pub fn with_degrees_of_freedom(self, degrees_of_freedom: T) -> Self {
        TestResult {
            degrees_of_freedom: Some(degrees_of_freedom),
            ..self
        }
    }

    pub fn with_standard_error(self, standard_error: T) -> Self {
        TestResult {
            standard_error: Some(standard_error),
            ..self
        }
    }

    /// `p_value < alpha`, on the raw p-value.
    pub fn is_significant(&self, alpha: T) -> bool {
        self.p_value < alpha
    }
}
