use crate::error::StatsResult;
use crate::testing::TestResult;

pub mod discrete;

pub mod parametric;

pub use discrete::{EnrichmentCount, HypergeometricTest};
pub use parametric::StudentTTest;

/// A statistical test computing a p-value from a typed input.
///
/// Implementations are stateless; every call is pure and independent, so a pipeline can
/// evaluate entities in any order before correcting the collected p-values.
pub trait SignificanceTest<I: ?Sized> {
    fn test(&self, input: &I) -> StatsResult<TestResult<f64>>;

    /// Convenience accessor for callers that only need the raw p-value.
    fn p_value(&self, input: &I) -> StatsResult<f64> {
        self.test(input).map(|r| r.p_value)
    }
}

/// Two groups of continuous observations, control first.
#[derive(Debug, Clone, Copy)]
pub struct TwoSample<'a> {
    pub control: &'a [f64],
    pub treatment: &'a [f64],
}

impl<'a> TwoSample<'a> {
    pub fn new(control: &'a [f64], treatment: &'a [f64]) -> Self {
        TwoSample { control, treatment }
    }
}
