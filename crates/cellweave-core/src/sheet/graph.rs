//! Dependency graph maintenance.
//!
//! Edges live on the cells themselves: `referenced` points at the cells a
//! formula reads, `dependents` points back. Every traversal here uses an
//! explicit stack so long reference chains cannot exhaust the call stack.

use std::collections::HashSet;

use cellweave_engine::Position;
use log::debug;

use super::Sheet;
use super::state::needs_eval;

impl Sheet {
    /// Check whether giving `start` the references `new_refs` would close a
    /// cycle.
    ///
    /// The only edges an edit adds are `start -> r` for each `r` in
    /// `new_refs`, so a cycle appears exactly when some `r` is already
    /// downstream of `start`. Walks the dependents of `start` and returns the
    /// first such reference found.
    pub(crate) fn find_cycle(
        &self,
        start: Position,
        new_refs: &HashSet<Position>,
    ) -> Option<Position> {
        if new_refs.is_empty() {
            return None;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            if !visited.insert(pos) {
                continue;
            }
            if new_refs.contains(&pos) {
                return Some(pos);
            }
            if let Some(cell) = self.slot(pos) {
                stack.extend(
                    cell.dependents
                        .iter()
                        .copied()
                        .filter(|dep| !visited.contains(dep)),
                );
            }
        }
        None
    }

    /// Replace the outgoing edges of `pos` with `new_refs`, keeping the
    /// reverse edges in step. Referenced cells that do not exist yet are
    /// created empty.
    pub(crate) fn replace_edges(&mut self, pos: Position, new_refs: &[Position]) {
        let old_refs = match self.slot_mut(pos) {
            Some(cell) => std::mem::take(&mut cell.referenced),
            None => HashSet::new(),
        };
        for old in old_refs {
            if let Some(cell) = self.slot_mut(old) {
                cell.dependents.remove(&pos);
            }
        }

        for &target in new_refs {
            if self.slot(target).is_none() {
                debug!("creating placeholder cell {} referenced by {}", target, pos);
            }
            self.ensure_slot(target).dependents.insert(pos);
        }

        self.ensure_slot(pos).referenced = new_refs.iter().copied().collect();
    }

    /// Drop memoized values that may depend on `root`.
    ///
    /// `root` is always invalidated and its direct dependents always
    /// visited. Further down, a dependent with no cached value ends the
    /// walk along that path: nothing below it can hold a value computed
    /// from the current state of `root`.
    pub(crate) fn invalidate_from(&self, root: Position) {
        let Some(cell) = self.slot(root) else {
            return;
        };
        cell.content.invalidate_cache();

        let mut stack: Vec<Position> = cell.dependents.iter().copied().collect();
        let mut invalidated = 0usize;
        while let Some(pos) = stack.pop() {
            let Some(cell) = self.slot(pos) else {
                continue;
            };
            if !cell.content.has_cache() {
                continue;
            }
            cell.content.invalidate_cache();
            invalidated += 1;
            stack.extend(cell.dependents.iter().copied());
        }

        if invalidated > 0 {
            debug!("invalidated {} cached values downstream of {}", invalidated, root);
        }
    }

    /// Evaluate every stale formula `root` transitively reads, deepest
    /// first, so that evaluating `root` itself only hits cached values.
    pub(crate) fn compute_upstream(&self, root: Position) {
        let mut expanded = HashSet::new();
        let mut stack = vec![(root, false)];

        while let Some((pos, ready)) = stack.pop() {
            let Some(cell) = self.slot(pos) else {
                continue;
            };
            if ready {
                cell.content.value(self);
                continue;
            }
            if !needs_eval(cell) || !expanded.insert(pos) {
                continue;
            }

            stack.push((pos, true));
            for &input in &cell.referenced {
                if self.slot(input).is_some_and(needs_eval) {
                    stack.push((input, false));
                }
            }
        }
    }
}
