//! Differential expression across a time course.
//!
//! For every configured time point each probe's control and treatment replicates are
//! summarised, compared with Student's t-test and given a log2 fold change. Probes whose
//! groups cannot be tested (fewer than two valid replicates, constant groups) are
//! excluded before correction, so the Bonferroni factor is the number of probes that were
//! actually tested at that time point. Time points never share statistics.

use crate::config::{DifferentialExpressionConfig, TimePointDesign};
use crate::error::StatsResult;
use crate::report::{Exclusion, RankedReport, ReportRow, format_p_value};
use crate::testing::correction::{Adjustable, correct_records};
use crate::testing::effect::log2_fold_change_between;
use crate::testing::inference::parametric::t_test_from_summaries;
use crate::testing::rank::{Ranked, top_n};
use crate::testing::summary::SummaryStats;
use anyhow::Context;
use log::{debug, info, warn};
use serde::Serialize;

mod table;

pub use table::{MeasurementTable, Probe, ProbeRow};

/// Differential expression result for one probe at one time point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub probe_id: String,
    pub symbol: String,
    pub control: SummaryStats,
    pub treatment: SummaryStats,
    /// log2(mean treatment / mean control); non-finite for non-positive means
    pub log_fc: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub p_adjusted: f64,
}

impl Ranked for ProbeResult {
    fn adjusted_p_value(&self) -> f64 {
        self.p_adjusted
    }
}

impl Adjustable for ProbeResult {
    fn raw_p_value(&self) -> f64 {
        self.p_value
    }

    fn set_adjusted_p_value(&mut self, p_adjusted: f64) {
        self.p_adjusted = p_adjusted;
    }
}

impl ReportRow for ProbeResult {
    fn header() -> &'static [&'static str] {
        &["ProbeID", "Symbol", "LogFC", "p_value", "p_adjusted"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.probe_id.clone(),
            self.symbol.clone(),
            format!("{:.4}", self.log_fc),
            format_p_value(self.p_value),
            format_p_value(self.p_adjusted),
        ]
    }
}

/// Tested probes of one time point, before ranking.
#[derive(Debug, Clone)]
pub struct TimePointBatch {
    pub label: String,
    /// Corrected results in table order
    pub results: Vec<ProbeResult>,
    pub excluded: Vec<Exclusion>,
}

/// Differential expression over a caller-owned measurement table.
pub struct DifferentialExpression<'a> {
    table: &'a MeasurementTable,
    config: &'a DifferentialExpressionConfig,
}

impl<'a> DifferentialExpression<'a> {
    pub fn new(table: &'a MeasurementTable, config: &'a DifferentialExpressionConfig) -> Self {
        DifferentialExpression { table, config }
    }

    /// Run every configured time point and return one ranked report per time point, in
    /// configuration order.
    pub fn run(&self) -> anyhow::Result<Vec<RankedReport<ProbeResult>>> {
        self.config.validate()?;
        self.config
            .time_points
            .iter()
            .map(|design| self.run_time_point(design))
            .collect()
    }

    /// Test, correct and rank a single time point.
    pub fn run_time_point(
        &self,
        design: &TimePointDesign,
    ) -> anyhow::Result<RankedReport<ProbeResult>> {
        let batch = self.test_time_point(design)?;
        let tested = batch.results.len();

        Ok(RankedReport {
            segment: batch.label,
            tested,
            excluded: batch.excluded,
            records: top_n(batch.results, self.config.top_n),
        })
    }

    /// Test and correct every probe of one time point without ranking.
    ///
    /// Phase one scores each probe and sets aside the untestable ones; phase two corrects
    /// the survivors against their own count.
    pub fn test_time_point(&self, design: &TimePointDesign) -> anyhow::Result<TimePointBatch> {
        let control_columns = self
            .table
            .resolve_columns(&design.control_columns)
            .with_context(|| format!("control group of time point '{}'", design.label))?;
        let treatment_columns = self
            .table
            .resolve_columns(&design.treatment_columns)
            .with_context(|| format!("treatment group of time point '{}'", design.label))?;

        let mut results = Vec::with_capacity(self.table.len());
        let mut excluded = Vec::new();

        for row in self.table.rows() {
            match score_probe(row, &control_columns, &treatment_columns) {
                Ok(result) => results.push(result),
                Err(e) => {
                    debug!(
                        "Excluding probe {} at {}: {}",
                        row.probe.probe_id, design.label, e
                    );
                    excluded.push(Exclusion {
                        identifier: row.probe.probe_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let tested = correct_records(&mut results)
            .with_context(|| format!("correcting p-values at time point '{}'", design.label))?;

        if tested == 0 {
            warn!(
                "No testable probes at {} ({} {} vs {} {})",
                design.label,
                design.treatment_group,
                design.treatment_columns.len(),
                design.control_group,
                design.control_columns.len()
            );
        } else {
            info!(
                "{}: {} vs {} tested {} probes, excluded {}",
                design.label,
                design.treatment_group,
                design.control_group,
                tested,
                excluded.len()
            );
        }

        Ok(TimePointBatch {
            label: design.label.clone(),
            results,
            excluded,
        })
    }
}

/// Summarise and test one probe. The corrected p-value is filled in later.
fn score_probe(
    row: &ProbeRow,
    control_columns: &[usize],
    treatment_columns: &[usize],
) -> StatsResult<ProbeResult> {
    let (control_values, control_dropped) = row.observations(control_columns);
    let (treatment_values, treatment_dropped) = row.observations(treatment_columns);
    if control_dropped + treatment_dropped > 0 {
        debug!(
            "Probe {}: dropped {} control and {} treatment cells",
            row.probe.probe_id, control_dropped, treatment_dropped
        );
    }

    let control = SummaryStats::from_values(&control_values)?;
    let treatment = SummaryStats::from_values(&treatment_values)?;
    let test = t_test_from_summaries(&control, &treatment)?;

    Ok(ProbeResult {
        probe_id: row.probe.probe_id.clone(),
        symbol: row.probe.symbol.clone(),
        control,
        treatment,
        log_fc: log2_fold_change_between(&control, &treatment),
        t_statistic: test.statistic,
        p_value: test.p_value,
        p_adjusted: test.p_value,
    })
}
