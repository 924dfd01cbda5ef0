use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// A single statement of knowledge about the board: exactly `count` of the
/// cells in `cells` contain a hazard.
///
/// Equality is structural (same cell set, same count), which is what the
/// knowledge base uses to suppress duplicate derivations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    cells: BTreeSet<Cell>,
    count: CellCount,
}

impl Constraint {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: CellCount) -> Self {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        debug_assert!(
            (count as usize) <= cells.len(),
            "hazard count exceeds constraint cell set"
        );
        Self { cells, count }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> CellCount {
        self.count
    }

    /// An empty constraint carries no information and can be pruned.
    pub fn is_vacuous(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells provably hazardous: every member, exactly when the count matches
    /// the set size. An empty constraint yields nothing.
    pub fn known_hazards(&self) -> BTreeSet<Cell> {
        if !self.cells.is_empty() && self.count as usize == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Cells provably hazard-free: every member, exactly when the count is
    /// zero and the set is non-empty.
    pub fn known_safe(&self) -> BTreeSet<Cell> {
        if !self.cells.is_empty() && self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Accounts for `cell` being a hazard: removes it and decrements the
    /// count. No-op when `cell` is not a member.
    pub fn mark_hazard(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            debug_assert!(self.count > 0, "hazard marked on a zero-count constraint");
            self.count -= 1;
        }
    }

    /// Accounts for `cell` being safe: removes it, count unchanged. No-op
    /// when `cell` is not a member.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    pub(crate) fn is_subset_of(&self, other: &Constraint) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Subset resolution: given `self ⊆ other`, the cells of `other` outside
    /// `self` must hold exactly the count difference.
    pub(crate) fn resolve_with(&self, other: &Constraint) -> Constraint {
        let cells: BTreeSet<Cell> = other.cells.difference(&self.cells).copied().collect();
        Constraint::new(cells, other.count - self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_count_proves_every_cell_hazardous() {
        let constraint = Constraint::new([(0, 0), (0, 1)], 2);

        assert_eq!(
            constraint.known_hazards(),
            BTreeSet::from([(0, 0), (0, 1)])
        );
        assert_eq!(constraint.known_safe(), BTreeSet::new());
    }

    #[test]
    fn zero_count_proves_every_cell_safe() {
        let constraint = Constraint::new([(1, 0), (1, 1), (1, 2)], 0);

        assert_eq!(constraint.known_hazards(), BTreeSet::new());
        assert_eq!(
            constraint.known_safe(),
            BTreeSet::from([(1, 0), (1, 1), (1, 2)])
        );
    }

    #[test]
    fn partial_count_proves_nothing() {
        let constraint = Constraint::new([(0, 0), (0, 1), (0, 2)], 1);

        assert_eq!(constraint.known_hazards(), BTreeSet::new());
        assert_eq!(constraint.known_safe(), BTreeSet::new());
    }

    #[test]
    fn empty_constraint_is_vacuous_not_contradictory() {
        let constraint = Constraint::new(BTreeSet::new(), 0);

        assert!(constraint.is_vacuous());
        assert_eq!(constraint.known_hazards(), BTreeSet::new());
        assert_eq!(constraint.known_safe(), BTreeSet::new());
    }

    #[test]
    fn mark_hazard_removes_cell_and_decrements() {
        let mut constraint = Constraint::new([(0, 0), (0, 1), (1, 1)], 2);

        constraint.mark_hazard((0, 1));

        assert_eq!(constraint.cells(), &BTreeSet::from([(0, 0), (1, 1)]));
        assert_eq!(constraint.count(), 1);
    }

    #[test]
    fn mark_safe_removes_cell_and_keeps_count() {
        let mut constraint = Constraint::new([(0, 0), (0, 1), (1, 1)], 2);

        constraint.mark_safe((1, 1));

        assert_eq!(constraint.cells(), &BTreeSet::from([(0, 0), (0, 1)]));
        assert_eq!(constraint.count(), 2);
    }

    #[test]
    fn marks_ignore_absent_cells() {
        let mut constraint = Constraint::new([(0, 0)], 1);

        constraint.mark_hazard((7, 7));
        constraint.mark_safe((7, 7));

        assert_eq!(constraint, Constraint::new([(0, 0)], 1));
    }

    #[test]
    fn duplicate_cells_collapse_on_construction() {
        let constraint = Constraint::new([(0, 0), (0, 0), (0, 1)], 1);

        assert_eq!(constraint.cells().len(), 2);
    }

    #[test]
    fn resolution_subtracts_cells_and_counts() {
        let smaller = Constraint::new([(0, 0), (0, 1)], 1);
        let larger = Constraint::new([(0, 0), (0, 1), (0, 2)], 1);

        let derived = smaller.resolve_with(&larger);

        assert_eq!(derived, Constraint::new([(0, 2)], 0));
    }

    #[test]
    fn equality_is_structural() {
        let a = Constraint::new([(0, 0), (0, 1)], 1);
        let b = Constraint::new([(0, 1), (0, 0)], 1);
        let c = Constraint::new([(0, 0), (0, 1)], 2);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
