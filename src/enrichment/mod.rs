//! Annotation term over-representation analysis.
//!
//! A foreground set of entities is tested against the background formed by every entity of
//! an [`AnnotationMapping`]. For each term with at least one foreground occurrence the
//! upper-tail hypergeometric probability of observing that many occurrences is computed,
//! and the p-values are Bonferroni-corrected by the number of terms actually tested.
//!
//! ## Quick Example
//!
//! ```rust
//! use expression_statistics::config::EnrichmentConfig;
//! use expression_statistics::enrichment::{AnnotationMapping, EnrichmentAnalysis};
//!
//! let mapping = AnnotationMapping::from_records([
//!     ("TP53", "apoptosis"),
//!     ("BAX", "apoptosis"),
//!     ("EGFR", "signalling"),
//!     ("MYC", "proliferation"),
//! ]);
//! let config = EnrichmentConfig::default();
//! let report = EnrichmentAnalysis::new(&mapping, &config)
//!     .run(&["TP53", "BAX"])
//!     .unwrap();
//!
//! assert_eq!(report.ranked.tested, 1);
//! assert_eq!(report.ranked.records[0].term, "apoptosis");
//! ```

mod ora;
mod utils;

pub use ora::{EnrichmentAnalysis, EnrichmentReport, TermEnrichment};
pub use utils::{Annotation, AnnotationMapping, TermCount, TermFrequencies, term_frequencies};
