//! Position weight matrices for aligned DNA motifs.
//!
//! Matrices have one row per motif position and one column per symbol of the [`DNA`]
//! alphabet. The scoring matrix is the pseudocount-corrected frequency divided by the
//! symbol's pseudocount weight. It is a plain ratio, not a log-odds score.

use crate::error::{StatsError, StatsResult};
use ndarray::Array2;

/// Column order of every matrix produced by this module.
pub const DNA: [char; 4] = ['A', 'C', 'G', 'T'];

fn symbol_index(symbol: char) -> Option<usize> {
    match symbol {
        'A' => Some(0),
        'C' => Some(1),
        'G' => Some(2),
        'T' => Some(3),
        _ => None,
    }
}

/// Per-symbol pseudocount weights, indexed like [`DNA`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudocountWeights {
    weights: [f64; 4],
}

impl PseudocountWeights {
    /// Weights for A, C, G and T. Each must be finite and positive.
    pub fn new(a: f64, c: f64, g: f64, t: f64) -> StatsResult<Self> {
        let weights = [a, c, g, t];
        for (symbol, &w) in DNA.iter().zip(&weights) {
            if !w.is_finite() || w <= 0.0 {
                return Err(StatsError::InvalidParameter(format!(
                    "pseudocount weight for {} must be positive, got {}",
                    symbol, w
                )));
            }
        }
        Ok(PseudocountWeights { weights })
    }

    pub fn get(&self, symbol: char) -> Option<f64> {
        symbol_index(symbol).map(|i| self.weights[i])
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }
}

impl Default for PseudocountWeights {
    /// A=0.3, C=0.2, G=0.2, T=0.3
    fn default() -> Self {
        PseudocountWeights {
            weights: [0.3, 0.2, 0.2, 0.3],
        }
    }
}

/// Symbol counts per position of a set of equal-length sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionWeightMatrix {
    counts: Array2<f64>,
    n_sequences: usize,
}

impl PositionWeightMatrix {
    /// Count symbols per position.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if there are no sequences, a sequence is empty, lengths differ,
    /// or a symbol is not an upper-case `A`, `C`, `G` or `T`.
    pub fn from_sequences<S: AsRef<str>>(sequences: &[S]) -> StatsResult<Self> {
        let first = sequences.first().ok_or_else(|| {
            StatsError::InvalidParameter("at least one sequence is required".to_string())
        })?;
        let width = first.as_ref().chars().count();
        if width == 0 {
            return Err(StatsError::InvalidParameter("sequences must not be empty".to_string()));
        }

        let mut counts = Array2::<f64>::zeros((width, DNA.len()));
        for (s, sequence) in sequences.iter().enumerate() {
            let sequence = sequence.as_ref();
            let length = sequence.chars().count();
            if length != width {
                return Err(StatsError::InvalidParameter(format!(
                    "sequence {} has length {}, expected {}",
                    s, length, width
                )));
            }
            for (pos, symbol) in sequence.chars().enumerate() {
                let idx = symbol_index(symbol).ok_or_else(|| {
                    StatsError::InvalidParameter(format!(
                        "unexpected symbol '{}' at position {} of sequence {}",
                        symbol, pos, s
                    ))
                })?;
                counts[[pos, idx]] += 1.0;
            }
        }

        Ok(PositionWeightMatrix {
            counts,
            n_sequences: sequences.len(),
        })
    }

    /// Motif width.
    pub fn len(&self) -> usize {
        self.counts.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.nrows() == 0
    }

    pub fn n_sequences(&self) -> usize {
        self.n_sequences
    }

    pub fn counts(&self) -> &Array2<f64> {
        &self.counts
    }

    /// Observed frequency of each symbol: `count / sequences`.
    pub fn frequency_matrix(&self) -> Array2<f64> {
        &self.counts / self.n_sequences as f64
    }

    /// `(count + w) / (sequences + sum(w))`. Every row sums to 1.
    pub fn corrected_frequency_matrix(&self, weights: &PseudocountWeights) -> Array2<f64> {
        let denom = self.n_sequences as f64 + weights.total();
        let mut corrected = self.counts.clone();
        for (mut column, &w) in corrected.columns_mut().into_iter().zip(&weights.weights) {
            column.mapv_inplace(|count| (count + w) / denom);
        }
        corrected
    }

    /// Corrected frequency divided by the symbol's pseudocount weight.
    pub fn scoring_matrix(&self, weights: &PseudocountWeights) -> Array2<f64> {
        let mut scores = self.corrected_frequency_matrix(weights);
        for (mut column, &w) in scores.columns_mut().into_iter().zip(&weights.weights) {
            column.mapv_inplace(|freq| freq / w);
        }
        scores
    }
}
