use cellweave_engine::{CellLookup, CellValue, Position};

use crate::cell::{Cell, Content};
use crate::error::{Result, SheetError};

/// A single sheet of cells.
///
/// The sheet is the only owner of its cells. Rows are allocated lazily and
/// may have different widths; a `None` slot was never written nor referenced.
#[derive(Debug, Default)]
pub struct Sheet {
    pub(crate) grid: Vec<Vec<Option<Cell>>>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn check_position(pos: Position) -> Result<()> {
        if pos.is_valid() {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    pub(crate) fn slot(&self, pos: Position) -> Option<&Cell> {
        self.grid.get(pos.row)?.get(pos.col)?.as_ref()
    }

    pub(crate) fn slot_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.grid.get_mut(pos.row)?.get_mut(pos.col)?.as_mut()
    }

    /// Get the cell at `pos`, growing the grid and allocating an empty cell
    /// if needed.
    pub(crate) fn ensure_slot(&mut self, pos: Position) -> &mut Cell {
        if self.grid.len() <= pos.row {
            self.grid.resize_with(pos.row + 1, Vec::new);
        }
        let row = &mut self.grid[pos.row];
        if row.len() <= pos.col {
            row.resize_with(pos.col + 1, || None);
        }
        row[pos.col].get_or_insert_with(Cell::new_empty)
    }

    pub(crate) fn remove_slot(&mut self, pos: Position) -> Option<Cell> {
        self.grid.get_mut(pos.row)?.get_mut(pos.col)?.take()
    }

    /// Current value of the cell at `pos`, computing stale formulas first.
    pub(crate) fn value_at(&self, pos: Position) -> CellValue {
        let Some(cell) = self.slot(pos) else {
            return CellValue::empty();
        };
        if needs_eval(cell) {
            self.compute_upstream(pos);
        }
        cell.content.value(self)
    }
}

/// A formula cell with no memoized result.
pub(crate) fn needs_eval(cell: &Cell) -> bool {
    matches!(cell.content, Content::Formula(_)) && !cell.content.has_cache()
}

impl CellLookup for Sheet {
    fn lookup(&self, pos: Position) -> CellValue {
        match self.slot(pos) {
            Some(cell) => cell.content.value(self),
            None => CellValue::empty(),
        }
    }
}

/// Read-only view of a non-empty cell.
#[derive(Clone, Copy)]
pub struct CellView<'a> {
    pub(crate) sheet: &'a Sheet,
    pub(crate) pos: Position,
    pub(crate) cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Value of the cell. Formula results are computed on first read and
    /// cached until something they depend on changes.
    pub fn value(&self) -> CellValue {
        self.sheet.value_at(self.pos)
    }

    pub fn text(&self) -> String {
        self.cell.content.text()
    }

    /// Positions this cell's formula reads, sorted.
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.content.referenced_cells()
    }

    /// Whether any formula reads this cell.
    pub fn is_referenced(&self) -> bool {
        self.cell.is_referenced()
    }
}

impl std::fmt::Debug for CellView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellView")
            .field("pos", &self.pos)
            .field("text", &self.text())
            .finish()
    }
}
