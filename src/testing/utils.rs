use crate::error::{StatsError, StatsResult};

/// Parse one measurement cell.
///
/// Cells are trimmed before parsing. Anything that is not a number (`""`, `NA`, `N/A`,
/// `null`, `-`, free text) and numeric `NaN` are missing values and come back as
/// [`StatsError::MissingValue`].
pub fn parse_measurement(cell: &str) -> StatsResult<f64> {
    match cell.trim().parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(StatsError::MissingValue(cell.to_string())),
    }
}

/// Parse a group of cells, dropping missing values.
///
/// Returns the valid observations in their original order together with the number of
/// dropped cells.
pub fn collect_observations<'a, I>(cells: I) -> (Vec<f64>, usize)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut values = Vec::new();
    let mut dropped = 0;
    for cell in cells {
        match parse_measurement(cell) {
            Ok(value) => values.push(value),
            Err(_) => dropped += 1,
        }
    }
    (values, dropped)
}
