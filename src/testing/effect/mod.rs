use crate::testing::summary::SummaryStats;
use num_traits::Float;

/// Calculate the log2 fold change of the treatment mean over the control mean.
///
/// Expression values are assumed strictly positive. No pseudo count is applied: a zero
/// or negative mean yields a non-finite result (`inf`, `-inf` or `NaN`) which is passed
/// through to the caller rather than reported as an error.
pub fn log2_fold_change<T>(control_mean: T, treatment_mean: T) -> T
where
    T: Float,
{
    (treatment_mean / control_mean).log2()
}

/// Log2 fold change between two summarised groups.
pub fn log2_fold_change_between(control: &SummaryStats, treatment: &SummaryStats) -> f64 {
    log2_fold_change(control.mean, treatment.mean)
}
