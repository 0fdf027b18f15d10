use crate::error::{StatsError, StatsResult};
use crate::testing::utils::collect_observations;
use serde::Serialize;
use std::collections::HashMap;

/// A measured feature: probe identifier plus gene symbol for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Probe {
    pub probe_id: String,
    pub symbol: String,
}

/// One probe with its raw, unparsed measurement cells.
#[derive(Debug, Clone)]
pub struct ProbeRow {
    pub probe: Probe,
    cells: Vec<String>,
}

impl ProbeRow {
    /// Parse the cells at `columns`, dropping missing values.
    ///
    /// Returns the valid observations in column order and the number of dropped cells.
    pub fn observations(&self, columns: &[usize]) -> (Vec<f64>, usize) {
        collect_observations(columns.iter().map(|&c| self.cells[c].as_str()))
    }
}

/// Measurement table: one row per probe, one cell per (group, time point, replicate) column.
///
/// Cells are kept as text and only parsed when a group is extracted, so non-numeric cells
/// surface as missing values at test time instead of failing the load.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<ProbeRow>,
}

impl MeasurementTable {
    /// Create an empty table with the given measurement column header.
    ///
    /// The `ProbeID` and `Symbol` columns are not part of the header. Duplicate column
    /// names are rejected.
    pub fn new<I, S>(columns: I) -> StatsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(StatsError::InvalidParameter(format!(
                    "duplicate measurement column '{}'",
                    name
                )));
            }
        }

        Ok(MeasurementTable {
            columns,
            index,
            rows: Vec::new(),
        })
    }

    /// Append a probe row. The number of cells must match the header.
    pub fn push_row<S>(
        &mut self,
        probe_id: impl Into<String>,
        symbol: impl Into<String>,
        cells: Vec<S>,
    ) -> StatsResult<()>
    where
        S: Into<String>,
    {
        let probe_id = probe_id.into();
        if cells.len() != self.columns.len() {
            return Err(StatsError::InvalidParameter(format!(
                "probe '{}' has {} cells, expected {}",
                probe_id,
                cells.len(),
                self.columns.len()
            )));
        }

        self.rows.push(ProbeRow {
            probe: Probe {
                probe_id,
                symbol: symbol.into(),
            },
            cells: cells.into_iter().map(Into::into).collect(),
        });
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Map column names to positions, failing on the first unknown name.
    pub fn resolve_columns(&self, names: &[String]) -> StatsResult<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| {
                    StatsError::InvalidParameter(format!("unknown measurement column '{}'", name))
                })
            })
            .collect()
    }

    pub fn rows(&self) -> &[ProbeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
