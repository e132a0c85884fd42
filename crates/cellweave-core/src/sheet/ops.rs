use std::collections::HashSet;

use cellweave_engine::Position;
use log::debug;

use super::{CellView, Sheet};
use crate::cell::Content;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// The new content is parsed and checked for cycles before anything is
    /// touched; on any error the sheet is left exactly as it was.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        Self::check_position(pos)?;

        let content = Content::from_input(text)?;
        let new_refs: HashSet<Position> = content.referenced_cells().iter().copied().collect();

        if let Some(closing) = self.find_cycle(pos, &new_refs) {
            debug!("rejecting edit of {}: {} already depends on it", pos, closing);
            return Err(SheetError::CircularDependency(pos));
        }

        let refs = content.referenced_cells().to_vec();
        self.ensure_slot(pos).content = content;
        self.replace_edges(pos, &refs);
        self.invalidate_from(pos);

        debug!("set {} ({} references)", pos, refs.len());
        Ok(())
    }

    /// Get a view of the cell at `pos`.
    ///
    /// Returns `None` for cells that were never written and for cells whose
    /// text is empty, including placeholders kept alive by references.
    pub fn cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        Self::check_position(pos)?;

        Ok(self
            .slot(pos)
            .filter(|cell| !cell.content.is_empty())
            .map(|cell| CellView {
                sheet: self,
                pos,
                cell,
            }))
    }

    /// Clear the specified cell.
    ///
    /// The cell stops reading anything and anything reading it sees an
    /// empty value. Its slot is freed unless other formulas still reference
    /// it.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        Self::check_position(pos)?;

        let Some(cell) = self.slot_mut(pos) else {
            return Ok(());
        };
        cell.content = Content::Empty;
        self.replace_edges(pos, &[]);
        self.invalidate_from(pos);

        if self.slot(pos).is_some_and(|cell| !cell.is_referenced()) {
            self.remove_slot(pos);
            debug!("cleared {} and released its slot", pos);
        } else {
            debug!("cleared {}; kept as placeholder for its dependents", pos);
        }
        Ok(())
    }

    /// Cells whose formulas read `pos`, sorted. Works for placeholder cells
    /// too.
    pub fn dependents_of(&self, pos: Position) -> Result<Vec<Position>> {
        Self::check_position(pos)?;

        let mut deps: Vec<Position> = self
            .slot(pos)
            .map(|cell| cell.dependents.iter().copied().collect())
            .unwrap_or_default();
        deps.sort();
        Ok(deps)
    }
}
