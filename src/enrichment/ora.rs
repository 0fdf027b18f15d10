use crate::config::EnrichmentConfig;
use crate::enrichment::utils::{AnnotationMapping, TermFrequencies, term_frequencies};
use crate::report::{Exclusion, RankedReport, ReportRow, format_p_value};
use crate::testing::correction::{Adjustable, correct_records};
use crate::testing::inference::{EnrichmentCount, HypergeometricTest, SignificanceTest};
use crate::testing::rank::{Ranked, top_n};
use anyhow::Context;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Over-representation result for one annotation term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermEnrichment {
    pub term: String,
    pub counts: EnrichmentCount,
    /// Expected overlap under the null hypothesis (n * m / N)
    pub expected: f64,
    pub fold_enrichment: f64,
    /// Hypergeometric upper-tail p-value: P(X >= k)
    pub p_value: f64,
    pub p_adjusted: f64,
}

impl Ranked for TermEnrichment {
    fn adjusted_p_value(&self) -> f64 {
        self.p_adjusted
    }
}

impl Adjustable for TermEnrichment {
    fn raw_p_value(&self) -> f64 {
        self.p_value
    }

    fn set_adjusted_p_value(&mut self, p_adjusted: f64) {
        self.p_adjusted = p_adjusted;
    }
}

impl ReportRow for TermEnrichment {
    fn header() -> &'static [&'static str] {
        &["Term", "k", "m", "n", "N", "p_value", "p_adjusted"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.term.clone(),
            self.counts.foreground_hits.to_string(),
            self.counts.background_hits.to_string(),
            self.counts.foreground_size.to_string(),
            self.counts.background_size.to_string(),
            format_p_value(self.p_value),
            format_p_value(self.p_adjusted),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentReport {
    pub frequencies: TermFrequencies,
    pub ranked: RankedReport<TermEnrichment>,
}

/// Over-representation analysis of a foreground set against a caller-owned annotation
/// mapping. The background population is every entity that appears in the mapping.
pub struct EnrichmentAnalysis<'a> {
    mapping: &'a AnnotationMapping,
    config: &'a EnrichmentConfig,
}

impl<'a> EnrichmentAnalysis<'a> {
    pub fn new(mapping: &'a AnnotationMapping, config: &'a EnrichmentConfig) -> Self {
        EnrichmentAnalysis { mapping, config }
    }

    /// Term frequency summary plus the ranked enrichment report.
    pub fn run<S: AsRef<str>>(&self, foreground: &[S]) -> anyhow::Result<EnrichmentReport> {
        let frequencies = self.term_frequencies(foreground);
        let (results, excluded) = self.test_terms(foreground)?;
        let tested = results.len();

        Ok(EnrichmentReport {
            frequencies,
            ranked: RankedReport {
                segment: "overall".to_string(),
                tested,
                excluded,
                records: top_n(results, self.config.top_n),
            },
        })
    }

    pub fn term_frequencies<S: AsRef<str>>(&self, foreground: &[S]) -> TermFrequencies {
        let foreground: HashSet<&str> = foreground.iter().map(AsRef::as_ref).collect();
        term_frequencies(self.mapping, &foreground, self.config.frequency_top_n)
    }

    /// Test every term with at least one foreground occurrence and correct the p-values
    /// against the number of terms tested. Results are in order of first appearance in the
    /// mapping; terms without foreground occurrences are returned as exclusions.
    ///
    /// Counts that violate the hypergeometric preconditions (e.g. a foreground larger than
    /// the background) are errors, not exclusions.
    pub fn test_terms<S: AsRef<str>>(
        &self,
        foreground: &[S],
    ) -> anyhow::Result<(Vec<TermEnrichment>, Vec<Exclusion>)> {
        let background = self.mapping.background();
        let mut foreground: HashSet<&str> = foreground.iter().map(AsRef::as_ref).collect();
        if self.config.restrict_foreground_to_background {
            foreground.retain(|entity| background.contains(entity));
        }

        let big_n = background.len() as u64;
        let n = foreground.len() as u64;

        // (m, k) per term
        let mut tallies: HashMap<&str, (u64, u64)> = HashMap::new();
        for annotation in self.mapping.records() {
            let tally = tallies.entry(annotation.term.as_str()).or_insert((0, 0));
            tally.0 += 1;
            if foreground.contains(annotation.entity.as_str()) {
                tally.1 += 1;
            }
        }

        let mut results = Vec::new();
        let mut excluded = Vec::new();
        for term in self.mapping.terms() {
            let (m, k) = tallies[term];
            if k == 0 {
                debug!("Skipping {}: no foreground occurrences", term);
                excluded.push(Exclusion {
                    identifier: term.to_string(),
                    reason: "no foreground occurrences".to_string(),
                });
                continue;
            }

            let counts = EnrichmentCount::new(m, big_n, n, k);
            let test = HypergeometricTest
                .test(&counts)
                .with_context(|| format!("hypergeometric test for term {}", term))?;
            debug!(
                "Term:{}\tPopulation: {}, Successes: {}, Draws: {}, Observed: {}",
                term, big_n, m, n, k
            );

            results.push(TermEnrichment {
                term: term.to_string(),
                counts,
                expected: counts.expected_overlap(),
                fold_enrichment: counts.fold_enrichment(),
                p_value: test.p_value,
                p_adjusted: test.p_value,
            });
        }

        let tested = correct_records(&mut results).context("correcting term p-values")?;
        if tested == 0 {
            warn!("No annotation term overlaps the foreground set ({} entities)", n);
        } else {
            info!(
                "Enrichment: tested {} terms, skipped {} (N={}, n={})",
                tested,
                excluded.len(),
                big_n,
                n
            );
        }

        Ok((results, excluded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn mapping() -> AnnotationMapping {
        AnnotationMapping::from_records([
            ("g1", "T1"),
            ("g2", "T1"),
            ("g3", "T1"),
            ("g3", "T2"),
            ("g4", "T2"),
            ("g5", "T3"),
            ("g6", "T3"),
            ("g7", "T4"),
            ("g8", "T4"),
            ("g9", "T4"),
            ("g10", "T4"),
        ])
    }

    #[test]
    fn test_counts_per_term() {
        let mapping = mapping();
        let config = EnrichmentConfig::default();
        let (results, excluded) = EnrichmentAnalysis::new(&mapping, &config)
            .test_terms(&["g1", "g2", "g3"])
            .unwrap();

        let terms: Vec<&str> = results.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, vec!["T1", "T2"]);
        assert_eq!(results[0].counts, EnrichmentCount::new(3, 10, 3, 3));
        assert_eq!(results[1].counts, EnrichmentCount::new(2, 10, 3, 1));

        let skipped: Vec<&str> = excluded.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(skipped, vec!["T3", "T4"]);

        // 1 / C(10, 3), corrected for two tested terms
        assert_relative_eq!(results[0].p_value, 1.0 / 120.0, max_relative = 1e-9);
        assert_relative_eq!(results[0].p_adjusted, 2.0 / 120.0, max_relative = 1e-9);
        assert_relative_eq!(results[0].expected, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_unannotated_foreground_counts_unless_restricted() {
        let mapping = mapping();
        let foreground = ["g1", "g2", "unannotated"];

        let config = EnrichmentConfig::default();
        let (results, _) = EnrichmentAnalysis::new(&mapping, &config)
            .test_terms(&foreground)
            .unwrap();
        assert_eq!(results[0].counts.foreground_size, 3);

        let config = EnrichmentConfig {
            restrict_foreground_to_background: true,
            ..EnrichmentConfig::default()
        };
        let (results, _) = EnrichmentAnalysis::new(&mapping, &config)
            .test_terms(&foreground)
            .unwrap();
        assert_eq!(results[0].counts.foreground_size, 2);
    }

    #[test]
    fn test_oversized_foreground_is_an_error() {
        let mapping = AnnotationMapping::from_records([("g1", "T1"), ("g2", "T1")]);
        let config = EnrichmentConfig::default();
        let err = EnrichmentAnalysis::new(&mapping, &config)
            .test_terms(&["g1", "x", "y"])
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<crate::error::StatsError>(),
            Some(crate::error::StatsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_run_ranks_and_renders() {
        let mapping = mapping();
        let config = EnrichmentConfig {
            top_n: 1,
            ..EnrichmentConfig::default()
        };
        let report = EnrichmentAnalysis::new(&mapping, &config)
            .run(&["g1", "g2", "g3"])
            .unwrap();

        assert_eq!(report.ranked.tested, 2);
        assert_eq!(report.ranked.len(), 1);
        assert_eq!(report.ranked.records[0].term, "T1");
        assert_eq!(report.frequencies.most_common[0].term, "T1");

        let text = report.ranked.to_string();
        assert!(text.starts_with("Top 1 at overall (2 tested, 2 excluded):"));
        assert!(text.lines().nth(1).unwrap().starts_with("Term"));
    }
}
