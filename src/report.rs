//! Ranked reports produced by the pipelines.
//!
//! A [`RankedReport`] covers one analysis segment (a time point, or the whole enrichment
//! run). It keeps the top records together with the bookkeeping needed to audit the
//! correction: how many entities were actually tested and which ones were excluded.
//! Reports render as fixed-width text tables through `Display` and as JSON through
//! [`RankedReport::to_json`].

use anyhow::Context;
use serde::Serialize;
use std::fmt;

/// An entity left out of testing, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub identifier: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedReport<R> {
    /// Segment label, e.g. a time point
    pub segment: String,
    /// Number of tests used as the correction factor (after exclusions)
    pub tested: usize,
    pub excluded: Vec<Exclusion>,
    /// Top records by ascending corrected p-value
    pub records: Vec<R>,
}

impl<R> RankedReport<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl<R: Serialize> RankedReport<R> {
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self)
            .with_context(|| format!("failed to serialise report '{}'", self.segment))
    }
}

/// A record that can be printed as one row of a text table.
pub trait ReportRow {
    fn header() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

pub(crate) fn format_p_value(p: f64) -> String {
    if p != 0.0 && p < 1e-4 {
        format!("{:.3e}", p)
    } else {
        format!("{:.6}", p)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

impl<R: ReportRow> fmt::Display for RankedReport<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Top {} at {} ({} tested, {} excluded):",
            self.records.len(),
            self.segment,
            self.tested,
            self.excluded.len()
        )?;

        let header = R::header();
        let rows: Vec<Vec<String>> = self.records.iter().map(R::cells).collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        write_row(f, header, &widths)?;
        for row in &rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            write_row(f, &cells, &widths)?;
        }
        Ok(())
    }
}
