//! Analysis configuration.
//! Plain serde data, loadable from TOML. Every field has a default so partial files work;
//! the defaults reproduce the reference air/smoke exposure time course.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub differential_expression: DifferentialExpressionConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: AnalysisConfig =
            toml::from_str(content).context("failed to parse analysis configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.differential_expression.validate()
    }
}

/// Columns compared at one time point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePointDesign {
    pub label: String,
    #[serde(default = "default_control_group")]
    pub control_group: String,
    #[serde(default = "default_treatment_group")]
    pub treatment_group: String,
    pub control_columns: Vec<String>,
    pub treatment_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentialExpressionConfig {
    #[serde(default = "default_time_points")]
    pub time_points: Vec<TimePointDesign>,
    #[serde(default = "default_de_top_n")]
    pub top_n: usize,
}

fn default_control_group()   -> String { "Air".to_string() }
fn default_treatment_group() -> String { "Smoke".to_string() }
fn default_de_top_n()        -> usize { 10 }

fn default_time_points() -> Vec<TimePointDesign> {
    DifferentialExpressionConfig::replicated("Air", "Smoke", &["2h", "4h", "24h"], &["A", "B", "C"])
        .time_points
}

impl Default for DifferentialExpressionConfig {
    fn default() -> Self {
        DifferentialExpressionConfig {
            time_points: default_time_points(),
            top_n: default_de_top_n(),
        }
    }
}

impl DifferentialExpressionConfig {
    /// Build a design from the `{group}_{time point}_{replicate}` column naming convention,
    /// e.g. `Air_2h_A`.
    pub fn replicated(
        control_group: &str,
        treatment_group: &str,
        time_points: &[&str],
        replicates: &[&str],
    ) -> Self {
        let columns = |group: &str, time_point: &str| -> Vec<String> {
            replicates
                .iter()
                .map(|rep| format!("{}_{}_{}", group, time_point, rep))
                .collect()
        };

        let time_points = time_points
            .iter()
            .map(|&tp| TimePointDesign {
                label: tp.to_string(),
                control_group: control_group.to_string(),
                treatment_group: treatment_group.to_string(),
                control_columns: columns(control_group, tp),
                treatment_columns: columns(treatment_group, tp),
            })
            .collect();

        DifferentialExpressionConfig {
            time_points,
            top_n: default_de_top_n(),
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut labels = HashSet::new();
        for design in &self.time_points {
            if !labels.insert(design.label.as_str()) {
                bail!("duplicate time point label '{}'", design.label);
            }
            if design.control_columns.is_empty() || design.treatment_columns.is_empty() {
                bail!(
                    "time point '{}' needs at least one control and one treatment column",
                    design.label
                );
            }
            let control: HashSet<&str> =
                design.control_columns.iter().map(String::as_str).collect();
            if let Some(shared) = design
                .treatment_columns
                .iter()
                .find(|c| control.contains(c.as_str()))
            {
                bail!(
                    "column '{}' is used by both groups at time point '{}'",
                    shared,
                    design.label
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Size of the ranked enrichment report
    #[serde(default = "default_enrichment_top_n")]
    pub top_n: usize,
    /// Size of the most/least common term lists
    #[serde(default = "default_frequency_top_n")]
    pub frequency_top_n: usize,
    /// Count only foreground entities that occur in the background towards `n`
    #[serde(default)]
    pub restrict_foreground_to_background: bool,
}

fn default_enrichment_top_n() -> usize { 20 }
fn default_frequency_top_n()  -> usize { 20 }

impl Default for EnrichmentConfig {
    fn default() -> Self {
        EnrichmentConfig {
            top_n: default_enrichment_top_n(),
            frequency_top_n: default_frequency_top_n(),
            restrict_foreground_to_background: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reference_design() {
        let config = DifferentialExpressionConfig::default();
        assert_eq!(config.top_n, 10);
        let labels: Vec<&str> = config.time_points.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["2h", "4h", "24h"]);

        let first = &config.time_points[0];
        assert_eq!(first.control_columns, vec!["Air_2h_A", "Air_2h_B", "Air_2h_C"]);
        assert_eq!(first.treatment_columns, vec!["Smoke_2h_A", "Smoke_2h_B", "Smoke_2h_C"]);
        assert_eq!(config.time_points[2].control_columns[1], "Air_24h_B");

        assert_eq!(EnrichmentConfig::default().top_n, 20);
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [enrichment]
            top_n = 5
            restrict_foreground_to_background = true
            "#,
        )
        .unwrap();
        assert_eq!(config.enrichment.top_n, 5);
        assert_eq!(config.enrichment.frequency_top_n, 20);
        assert!(config.enrichment.restrict_foreground_to_background);
        assert_eq!(config.differential_expression, DifferentialExpressionConfig::default());
    }

    #[test]
    fn test_explicit_time_points() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [differential_expression]
            top_n = 3

            [[differential_expression.time_points]]
            label = "1h"
            control_group = "vehicle"
            treatment_group = "drug"
            control_columns = ["v1", "v2"]
            treatment_columns = ["d1", "d2"]
            "#,
        )
        .unwrap();
        let de = &config.differential_expression;
        assert_eq!(de.top_n, 3);
        assert_eq!(de.time_points.len(), 1);
        assert_eq!(de.time_points[0].treatment_group, "drug");
    }

    #[test]
    fn test_validation_errors() {
        let mut config = DifferentialExpressionConfig::default();
        config.time_points[1].label = "2h".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));

        let mut config = DifferentialExpressionConfig::default();
        config.time_points[0].treatment_columns.clear();
        assert!(config.validate().is_err());

        let mut config = DifferentialExpressionConfig::default();
        config.time_points[0].treatment_columns[0] = "Air_2h_A".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("both groups"));

        assert!(AnalysisConfig::from_toml_str("top_n = [").is_err());
    }
}
