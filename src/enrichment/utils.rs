use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One (entity, term) annotation record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    pub entity: String,
    pub term: String,
}

/// Many-to-many entity → term mapping.
///
/// Records are deduplicated and kept in first-seen order, which fixes the order in which
/// terms are tested and therefore how ties are broken in ranked output.
#[derive(Debug, Clone, Default)]
pub struct AnnotationMapping {
    records: Vec<Annotation>,
    seen: HashSet<Annotation>,
}

impl AnnotationMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I, E, T>(records: I) -> Self
    where
        I: IntoIterator<Item = (E, T)>,
        E: Into<String>,
        T: Into<String>,
    {
        let mut mapping = Self::new();
        for (entity, term) in records {
            mapping.insert(entity, term);
        }
        mapping
    }

    /// Add a record; returns `false` if the pair was already present.
    pub fn insert(&mut self, entity: impl Into<String>, term: impl Into<String>) -> bool {
        let annotation = Annotation {
            entity: entity.into(),
            term: term.into(),
        };
        if self.seen.contains(&annotation) {
            return false;
        }
        self.seen.insert(annotation.clone());
        self.records.push(annotation);
        true
    }

    pub fn records(&self) -> &[Annotation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct annotated entities: the background population.
    pub fn background(&self) -> HashSet<&str> {
        self.records.iter().map(|a| a.entity.as_str()).collect()
    }

    /// Distinct terms in order of first appearance.
    pub fn terms(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|a| a.term.as_str())
            .filter(|term| seen.insert(*term))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Descriptive term counts over the foreground entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequencies {
    /// Highest counts first; equal counts in order of first appearance
    pub most_common: Vec<TermCount>,
    /// Lowest counts first; equal counts by term id
    pub least_common: Vec<TermCount>,
}

/// Count how many foreground entities carry each term and keep the `n` most and least
/// common terms. Entities outside the foreground are ignored.
pub fn term_frequencies(
    mapping: &AnnotationMapping,
    foreground: &HashSet<&str>,
    n: usize,
) -> TermFrequencies {
    let mut counts: Vec<TermCount> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for annotation in mapping.records() {
        if !foreground.contains(annotation.entity.as_str()) {
            continue;
        }
        let idx = *position.entry(annotation.term.as_str()).or_insert_with(|| {
            counts.push(TermCount {
                term: annotation.term.clone(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[idx].count += 1;
    }

    let mut most_common = counts.clone();
    most_common.sort_by(|a, b| b.count.cmp(&a.count));
    most_common.truncate(n);

    let mut least_common = counts;
    least_common.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.term.cmp(&b.term)));
    least_common.truncate(n);

    TermFrequencies {
        most_common,
        least_common,
    }
}
