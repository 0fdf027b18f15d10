//! # expression-statistics
//!
//! Statistical analysis of bulk gene expression time courses and annotation term sets.
//!
//! The crate compares control and treatment replicates probe by probe, tests annotation
//! terms for over-representation in a foreground set, corrects for multiple testing and
//! ranks the results. It also builds position weight matrices for aligned DNA motifs.
//!
//! ## Core Features
//!
//! - **Differential Expression**: per time point Student t-tests with log2 fold changes
//! - **Term Enrichment**: hypergeometric upper-tail tests over an annotation mapping
//! - **Multiple Testing Correction**: Bonferroni, applied after untestable entities are excluded
//! - **Motif Matrices**: frequency, pseudocount-corrected and scoring matrices
//!
//! ## Quick Start
//!
//! Load a [`MeasurementTable`], describe the time points in a
//! [`DifferentialExpressionConfig`] and call [`DifferentialExpression::run`] to get one
//! ranked report per time point.
//!
//! ## Module Organization
//!
//! - **[`testing`]**: Summary statistics, significance tests, correction and ranking
//! - **[`expression`]**: Measurement tables and the differential expression pipeline
//! - **[`enrichment`]**: Annotation mappings, term frequencies and over-representation
//! - **[`motif`]**: Position weight matrices
//! - **[`report`]**: Ranked reports and their text/JSON rendering
//! - **[`config`]**: TOML-loadable analysis configuration

pub mod config;
pub mod enrichment;
pub mod error;
pub mod expression;
pub mod motif;
pub mod report;
pub mod testing;

pub use config::{AnalysisConfig, DifferentialExpressionConfig, EnrichmentConfig, TimePointDesign};
pub use error::{StatsError, StatsResult};
pub use expression::{DifferentialExpression, MeasurementTable, ProbeResult};
pub use report::RankedReport;
