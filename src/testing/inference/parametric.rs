//! Parametric two-sample tests for continuous measurements.
//!
//! This module implements the pooled-variance (Student's) t-test used to compare control
//! and treatment replicates of a single probe. The test is evaluated from per-group
//! summary statistics, so callers that already summarised a group can reuse them.

use crate::error::{StatsError, StatsResult};
use crate::testing::inference::{SignificanceTest, TwoSample};
use crate::testing::summary::SummaryStats;
use crate::testing::TestResult;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Student's two-sample t-test assuming equal population variances.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentTTest;

impl<'a> SignificanceTest<TwoSample<'a>> for StudentTTest {
    fn test(&self, input: &TwoSample<'a>) -> StatsResult<TestResult<f64>> {
        student_t_test(input.control, input.treatment)
    }
}

/// Perform Student's t-test comparing two samples.
///
/// # Arguments
///
/// * `control` - Observations of the reference group
/// * `treatment` - Observations of the compared group
///
/// # Returns
///
/// `TestResult` with the t-statistic (`mean(control) - mean(treatment)` over its standard
/// error), the two-sided p-value and `n1 + n2 - 2` degrees of freedom.
///
/// Fails with [`StatsError::InsufficientData`] when either group has fewer than two
/// observations or when both groups are constant (zero pooled variance).
pub fn student_t_test(control: &[f64], treatment: &[f64]) -> StatsResult<TestResult<f64>> {
    let control_stats = SummaryStats::from_values(control)?;
    let treatment_stats = SummaryStats::from_values(treatment)?;
    t_test_from_summaries(&control_stats, &treatment_stats)
}

/// Perform Student's t-test using precomputed summary statistics.
pub fn t_test_from_summaries(
    control: &SummaryStats,
    treatment: &SummaryStats,
) -> StatsResult<TestResult<f64>> {
    if control.n < 2 || treatment.n < 2 {
        return Err(StatsError::InsufficientData(format!(
            "t-test needs at least 2 observations per group, got {} and {}",
            control.n, treatment.n
        )));
    }

    let n1 = control.n as f64;
    let n2 = treatment.n as f64;
    let df = n1 + n2 - 2.0;

    let pooled_var = ((n1 - 1.0) * control.variance + (n2 - 1.0) * treatment.variance) / df;
    if !pooled_var.is_finite() {
        return Err(StatsError::InvalidParameter(format!(
            "pooled variance is not finite: {}",
            pooled_var
        )));
    }
    if pooled_var <= 0.0 {
        return Err(StatsError::InsufficientData(
            "both groups are constant, the t-statistic is undefined (zero pooled variance)"
                .to_string(),
        ));
    }

    let std_err = (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
    let t_stat = (control.mean - treatment.mean) / std_err;
    let p_value = two_sided_p_value(t_stat, df)?;

    Ok(TestResult::new(t_stat, p_value)
        .with_degrees_of_freedom(df)
        .with_standard_error(std_err))
}

fn two_sided_p_value(t_stat: f64, df: f64) -> StatsResult<f64> {
    if t_stat.is_nan() {
        return Err(StatsError::InvalidParameter("t-statistic is NaN".to_string()));
    }
    if t_stat.is_infinite() {
        return Ok(0.0);
    }

    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatsError::InvalidParameter(format!("Student's t with df={}: {}", df, e)))?;

    Ok((2.0 * t_dist.sf(t_stat.abs())).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_degrees_of_freedom_closed_form() {
        // df = 2: P(|T| > t) = 1 - t / sqrt(2 + t^2); here t = -1/sqrt(2)
        let result = student_t_test(&[1.0, 3.0], &[2.0, 4.0]).unwrap();
        assert_relative_eq!(result.statistic, -std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 1.0 - 1.0 / 5.0f64.sqrt(), epsilon = 1e-9);
        assert_eq!(result.degrees_of_freedom, Some(2.0));
    }

    #[test]
    fn test_clear_separation() {
        let result = student_t_test(&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0]).unwrap();
        assert_relative_eq!(result.statistic, -7.348469228349534, epsilon = 1e-9);
        assert!(result.p_value > 0.001 && result.p_value < 0.005, "p = {}", result.p_value);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn test_same_means() {
        let result =
            student_t_test(&[1.0, 10.0, 2.0, 9.0, 3.0], &[2.0, 8.0, 4.0, 7.0, 4.0]).unwrap();
        assert_relative_eq!(result.statistic, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_statistic_sign_follows_control_minus_treatment() {
        let up = student_t_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 7.0]).unwrap();
        let down = student_t_test(&[4.0, 5.0, 7.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(up.statistic < 0.0);
        assert_relative_eq!(up.statistic, -down.statistic, epsilon = 1e-12);
        assert_relative_eq!(up.p_value, down.p_value, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_groups_are_insufficient() {
        let result = student_t_test(&[10.0, 10.0, 10.0], &[20.0, 20.0, 20.0]);
        assert!(matches!(result, Err(StatsError::InsufficientData(_))));
    }

    #[test]
    fn test_constant_decimal_groups_are_insufficient() {
        // 0.1 * 3 / 3 is not exactly 0.1
        let result = student_t_test(&[0.1, 0.1, 0.1], &[7.3, 7.3, 7.3]);
        assert!(matches!(result, Err(StatsError::InsufficientData(_))), "{:?}", result);
    }

    #[test]
    fn test_one_constant_group_is_fine() {
        let result = student_t_test(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).unwrap();
        assert!(result.p_value > 0.0 && result.p_value < 0.05);
    }

    #[test]
    fn test_too_few_observations() {
        let result = student_t_test(&[1.0], &[2.0, 3.0, 4.0]);
        assert!(matches!(result, Err(StatsError::InsufficientData(_))));
    }

    #[test]
    fn test_trait_dispatch_matches_function() {
        let control = [2.0, 2.2, 1.8];
        let treatment = [8.0, 7.5, 8.5];
        let via_trait = StudentTTest.test(&TwoSample::new(&control, &treatment)).unwrap();
        let direct = student_t_test(&control, &treatment).unwrap();
        assert_eq!(via_trait, direct);
        assert_eq!(
            StudentTTest.p_value(&TwoSample::new(&control, &treatment)).unwrap(),
            direct.p_value
        );
    }
}
