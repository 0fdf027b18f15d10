//! Multiple testing correction to control the family-wise error rate
//! when performing many statistical tests simultaneously.

use anyhow::{Result, anyhow};

/// Adjust a single p-value for `n_tests` simultaneous tests: `min(1, p * n_tests)`.
pub fn bonferroni_adjust(p_value: f64, n_tests: usize) -> f64 {
    (p_value * n_tests as f64).min(1.0)
}

/// Bonferroni-adjust a batch of raw p-values, returning them in input order.
///
/// The family size is `p_values.len()`. Anything that was not tested (excluded probes,
/// terms without foreground hits) has to be filtered out before this call.
///
/// Fails on an empty batch and on values outside `[0, 1]`, NaN included.
///
/// ```
/// use expression_statistics::testing::correction::bonferroni_correction;
///
/// let adjusted = bonferroni_correction(&[0.01, 0.02, 0.5]).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert_eq!(adjusted[2], 1.0);
/// ```
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    let n_tests = p_values.len();
    if n_tests == 0 {
        return Err(anyhow!("Empty p-value array"));
    }

    if let Some((i, p)) = p_values
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
    }

    Ok(p_values
        .iter()
        .map(|&p| bonferroni_adjust(p, n_tests))
        .collect())
}

/// A per-entity record with a raw p-value and a slot for its corrected value.
pub trait Adjustable {
    fn raw_p_value(&self) -> f64;
    fn set_adjusted_p_value(&mut self, p_adjusted: f64);
}

/// Bonferroni-correct a batch of records in place and return the number of tests used.
///
/// The correction factor is `records.len()`: the batch must already be filtered down to
/// the entities that were actually tested. An empty batch is left as is.
pub fn correct_records<R: Adjustable>(records: &mut [R]) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let raw: Vec<f64> = records.iter().map(Adjustable::raw_p_value).collect();
    let adjusted = bonferroni_correction(&raw)?;
    for (record, p_adjusted) in records.iter_mut().zip(adjusted) {
        record.set_adjusted_p_value(p_adjusted);
    }
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn assert_all_close(actual: &[f64], expected: &[f64], epsilon: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = epsilon);
        }
    }

    #[test]
    fn test_bonferroni() {
        let p_values = vec![0.01, 0.02, 0.03, 0.1, 0.2];
        let expected = vec![0.05, 0.1, 0.15, 0.5, 1.0];
        let adjusted = bonferroni_correction(&p_values).unwrap();
        assert_all_close(&adjusted, &expected, 1e-10);
    }

    #[test]
    fn test_three_tests_capped() {
        let adjusted = bonferroni_correction(&[0.01, 0.02, 0.5]).unwrap();
        assert_all_close(&adjusted, &[0.03, 0.06, 1.0], 1e-12);
    }

    #[test]
    fn test_single_test_is_unchanged() {
        assert_relative_eq!(bonferroni_adjust(0.025, 1), 0.025);
        assert_eq!(bonferroni_correction(&[0.025]).unwrap(), vec![0.025]);
        assert_eq!(bonferroni_adjust(1.0, 1), 1.0);
    }

    #[test]
    fn test_input_order_preserved() {
        let adjusted = bonferroni_correction(&[0.2, 0.001, 0.05]).unwrap();
        assert_all_close(&adjusted, &[0.6, 0.003, 0.15], 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        let result = bonferroni_correction(&[]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Empty p-value array");

        let result = bonferroni_correction(&[0.01, -0.5, 0.03]);
        assert!(result.unwrap_err().to_string().contains("Invalid p-value at index 1"));

        let result = bonferroni_correction(&[0.01, f64::NAN]);
        assert!(result.unwrap_err().to_string().contains("Invalid p-value at index 1"));

        assert!(bonferroni_correction(&[1.5]).is_err());
    }

    struct Record {
        p: f64,
        adjusted: Option<f64>,
    }

    impl Adjustable for Record {
        fn raw_p_value(&self) -> f64 {
            self.p
        }

        fn set_adjusted_p_value(&mut self, p_adjusted: f64) {
            self.adjusted = Some(p_adjusted);
        }
    }

    #[test]
    fn test_correct_records_uses_batch_size() {
        let mut records: Vec<Record> = [0.01, 0.02, 0.5]
            .iter()
            .map(|&p| Record { p, adjusted: None })
            .collect();
        let n = correct_records(&mut records).unwrap();
        assert_eq!(n, 3);
        assert_relative_eq!(records[0].adjusted.unwrap(), 0.03, epsilon = 1e-12);
        assert_relative_eq!(records[1].adjusted.unwrap(), 0.06, epsilon = 1e-12);
        assert_eq!(records[2].adjusted, Some(1.0));

        let mut empty: Vec<Record> = Vec::new();
        assert_eq!(correct_records(&mut empty).unwrap(), 0);
    }

    proptest! {
        #[test]
        fn corrected_bounded_by_raw_and_one(
            p_values in proptest::collection::vec(0.0f64..=1.0, 1..50)
        ) {
            let adjusted = bonferroni_correction(&p_values).unwrap();
            for (raw, adj) in p_values.iter().zip(adjusted.iter()) {
                prop_assert!(adj >= raw);
                prop_assert!(*adj <= 1.0);
            }
        }

        #[test]
        fn single_test_is_min_one(p in 0.0f64..2.0) {
            prop_assert_eq!(bonferroni_adjust(p, 1), p.min(1.0));
        }
    }
}
