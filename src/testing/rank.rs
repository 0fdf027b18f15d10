//! Deterministic top-N selection by corrected p-value.

/// A record that can be ordered by its corrected p-value.
pub trait Ranked {
    fn adjusted_p_value(&self) -> f64;
}

/// Indices of the `n` smallest values, ascending.
///
/// Equal values keep their input order. Asking for more entries than exist returns all of
/// them.
pub fn top_indices(adjusted_p_values: &[f64], n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..adjusted_p_values.len()).collect();
    // `sort_by` is stable, so ties stay in input order
    indices.sort_by(|&a, &b| adjusted_p_values[a].total_cmp(&adjusted_p_values[b]));
    indices.truncate(n);
    indices
}

/// Order `records` by ascending corrected p-value and keep the first `n`.
pub fn top_n<R: Ranked>(mut records: Vec<R>, n: usize) -> Vec<R> {
    records.sort_by(|a, b| a.adjusted_p_value().total_cmp(&b.adjusted_p_value()));
    records.truncate(n);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: usize,
        p: f64,
    }

    impl Ranked for Entry {
        fn adjusted_p_value(&self) -> f64 {
            self.p
        }
    }

    fn entries(ps: &[f64]) -> Vec<Entry> {
        ps.iter().enumerate().map(|(id, &p)| Entry { id, p }).collect()
    }

    #[test]
    fn test_top_two() {
        let top = top_n(entries(&[0.03, 0.06, 1.0]), 2);
        assert_eq!(top.iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let top = top_n(entries(&[1.0, 0.5, 1.0, 0.5, 1.0]), 5);
        assert_eq!(top.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 3, 0, 2, 4]);

        assert_eq!(top_indices(&[1.0, 1.0, 1.0], 2), vec![0, 1]);
    }

    #[test]
    fn test_more_requested_than_available() {
        let top = top_n(entries(&[0.2, 0.1]), 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, 1);

        assert!(top_n(Vec::<Entry>::new(), 3).is_empty());
        assert_eq!(top_indices(&[0.4], 0), Vec::<usize>::new());
    }

    proptest! {
        #[test]
        fn top_is_prefix_of_full_sort(
            ps in proptest::collection::vec(prop_oneof![Just(1.0), 0.0f64..1.0], 0..40),
            n in 0usize..50,
        ) {
            let full = top_n(entries(&ps), ps.len());
            let top = top_n(entries(&ps), n);
            prop_assert_eq!(top.len(), n.min(ps.len()));
            prop_assert_eq!(&top[..], &full[..top.len()]);
            for pair in top.windows(2) {
                prop_assert!(pair[0].p <= pair[1].p);
            }
            let indices = top_indices(&ps, n);
            prop_assert_eq!(indices, top.iter().map(|e| e.id).collect::<Vec<_>>());
        }
    }
}
