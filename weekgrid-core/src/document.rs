//! Canonical calendar documents and their JSON interchange form.
//!
//! Documents are handled as typed values inside the engine. The
//! `{"cells":[...]}` text form only appears at the store and view boundary.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

use crate::cell::Cell;
use crate::error::{GridError, GridResult};

/// A set of occupied grid cells, each id appearing at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CalendarDocument {
    cells: Vec<Cell>,
}

impl CalendarDocument {
    /// The empty document, identity for [`crate::combine::combine`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a document, rejecting duplicate cell ids.
    pub fn from_cells(cells: Vec<Cell>) -> GridResult<Self> {
        let mut seen = HashSet::with_capacity(cells.len());
        for cell in &cells {
            if !seen.insert(cell.id.as_str()) {
                return Err(GridError::Schema(format!(
                    "cell '{}' appears more than once",
                    cell.id
                )));
            }
        }
        Ok(CalendarDocument { cells })
    }

    /// Caller guarantees the ids are unique.
    pub(crate) fn from_unique_cells(cells: Vec<Cell>) -> Self {
        CalendarDocument { cells }
    }

    /// Parse the canonical JSON form.
    ///
    /// Malformed JSON is a `Parse` error. Any cell failing validation rejects
    /// the whole document with `Schema`; no partially valid document is built.
    pub fn from_json(json: &str) -> GridResult<Self> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| GridError::Parse(format!("calendar JSON: {}", e)))?;

        let raw_cells = root
            .get("cells")
            .and_then(Value::as_array)
            .ok_or_else(|| GridError::Schema("document must have a 'cells' array".into()))?;

        let cells = raw_cells
            .iter()
            .map(Cell::validate)
            .collect::<GridResult<Vec<Cell>>>()?;

        Self::from_cells(cells)
    }

    pub fn to_json(&self) -> GridResult<String> {
        serde_json::to_string(self).map_err(|e| GridError::Serialization(e.to_string()))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest occupancy of any cell, 0 for an empty document.
    pub fn max_people(&self) -> usize {
        self.cells.iter().map(|c| c.num_people).max().unwrap_or(0)
    }
}
