//! Sheet storage and the cell lookup seam

use ahash::AHashMap;

use crate::cell::{Cell, CellError};
use crate::label::CellLabel;

/// Read-only cell lookup
///
/// The evaluation engine borrows an implementor of this trait and never
/// mutates it. [`Sheet`] is the in-memory implementation; anything that can
/// hand out a [`Cell`] by label (a database view, a test fixture) works the
/// same way.
pub trait CellSource {
    /// Look up a cell by label
    ///
    /// Absent cells are treated by consumers exactly like present cells with
    /// an empty formula.
    fn cell(&self, label: CellLabel) -> Option<&Cell>;
}

/// A sparse in-memory sheet
///
/// Cells are stored only once touched; everything else is implicitly empty.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    cells: AHashMap<CellLabel, Cell>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cells are stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell by label
    pub fn cell(&self, label: CellLabel) -> Option<&Cell> {
        self.cells.get(&label)
    }

    /// Get a mutable cell by label
    pub fn cell_mut(&mut self, label: CellLabel) -> Option<&mut Cell> {
        self.cells.get_mut(&label)
    }

    /// Insert or replace a whole cell
    pub fn set_cell(&mut self, label: CellLabel, cell: Cell) {
        self.cells.insert(label, cell);
    }

    /// Enter a numeric literal into a cell
    ///
    /// Replaces the cell's content with the literal, which becomes both the
    /// stored formula and the computed value.
    pub fn set_value(&mut self, label: CellLabel, value: f64) {
        self.cells.insert(label, Cell::with_value(value));
    }

    /// Enter raw formula tokens into a cell
    ///
    /// An empty token list marks the cell with the empty-formula
    /// classification and resets its value. A non-empty list clears any
    /// previous classification; the stored value stays stale until the cell
    /// is evaluated again.
    pub fn set_formula(&mut self, label: CellLabel, tokens: Vec<String>) {
        let cell = self.cells.entry(label).or_default();
        if tokens.is_empty() {
            cell.set_formula(Vec::new());
            cell.set_value(0.0);
            cell.set_error(Some(CellError::EmptyFormula));
        } else {
            cell.set_formula(tokens);
            cell.set_error(None);
        }
    }

    /// Attach an error classification to a cell
    pub fn set_error(&mut self, label: CellLabel, error: CellError) {
        self.cells.entry(label).or_default().set_error(Some(error));
    }

    /// Iterate over stored cells in arbitrary order
    pub fn cells(&self) -> impl Iterator<Item = (&CellLabel, &Cell)> {
        self.cells.iter()
    }
}

impl CellSource for Sheet {
    fn cell(&self, label: CellLabel) -> Option<&Cell> {
        self.cells.get(&label)
    }
}
