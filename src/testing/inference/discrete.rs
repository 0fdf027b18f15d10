use crate::error::{StatsError, StatsResult};
use crate::testing::inference::SignificanceTest;
use crate::testing::TestResult;
use serde::Serialize;
use statrs::distribution::{DiscreteCDF, Hypergeometric};

/// Overlap counts for one annotation term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnrichmentCount {
    /// Entities in the background carrying the term (m)
    pub background_hits: u64,
    /// Background population size (N)
    pub background_size: u64,
    /// Foreground (query set) size (n)
    pub foreground_size: u64,
    /// Foreground entities carrying the term (k)
    pub foreground_hits: u64,
}

impl EnrichmentCount {
    pub fn new(
        background_hits: u64,
        background_size: u64,
        foreground_size: u64,
        foreground_hits: u64,
    ) -> Self {
        EnrichmentCount {
            background_hits,
            background_size,
            foreground_size,
            foreground_hits,
        }
    }

    /// Check `0 < m <= N`, `0 < n <= N` and `k <= min(m, n)`.
    pub fn validate(&self) -> StatsResult<()> {
        let (m, big_n, n, k) = self.as_tuple();

        if m == 0 || m > big_n {
            return Err(StatsError::InvalidParameter(format!(
                "term occurrences m={} must satisfy 0 < m <= N={}",
                m, big_n
            )));
        }
        if n == 0 || n > big_n {
            return Err(StatsError::InvalidParameter(format!(
                "foreground size n={} must satisfy 0 < n <= N={}",
                n, big_n
            )));
        }
        if k > m.min(n) {
            return Err(StatsError::InvalidParameter(format!(
                "foreground occurrences k={} exceed min(m={}, n={})",
                k, m, n
            )));
        }
        Ok(())
    }

    /// Expected overlap under the null hypothesis: `n * m / N`.
    pub fn expected_overlap(&self) -> f64 {
        self.foreground_size as f64 * self.background_hits as f64 / self.background_size as f64
    }

    /// Ratio of the foreground hit rate to the background hit rate.
    pub fn fold_enrichment(&self) -> f64 {
        (self.foreground_hits as f64 / self.foreground_size as f64)
            / (self.background_hits as f64 / self.background_size as f64)
    }

    fn as_tuple(&self) -> (u64, u64, u64, u64) {
        (
            self.background_hits,
            self.background_size,
            self.foreground_size,
            self.foreground_hits,
        )
    }
}

/// Upper-tail hypergeometric test for term over-representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HypergeometricTest;

impl SignificanceTest<EnrichmentCount> for HypergeometricTest {
    fn test(&self, input: &EnrichmentCount) -> StatsResult<TestResult<f64>> {
        let p_value = hypergeometric_survival(input)?;
        Ok(TestResult::new(input.foreground_hits as f64, p_value))
    }
}

/// P(X >= k) for X ~ Hypergeometric(N, m, n), i.e. the survival function at `k - 1`.
///
/// Whenever `k` does not exceed the lowest attainable overlap `max(0, n + m - N)` the
/// probability is exactly 1.
pub fn hypergeometric_survival(count: &EnrichmentCount) -> StatsResult<f64> {
    count.validate()?;
    let (m, big_n, n, k) = count.as_tuple();

    let lowest = (n + m).saturating_sub(big_n);
    if k <= lowest {
        return Ok(1.0);
    }

    let hyper = Hypergeometric::new(big_n, m, n).map_err(|e| {
        StatsError::InvalidParameter(format!(
            "hypergeometric distribution with N={}, m={}, n={}: {}",
            big_n, m, n, e
        ))
    })?;

    // "k or more": sf(x) is P(X > x)
    Ok(hyper.sf(k - 1).min(1.0))
}
