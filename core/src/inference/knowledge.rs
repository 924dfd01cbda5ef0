use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Compact counters describing the current state of a knowledge base.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStats {
    pub constraint_count: usize,
    pub revealed_count: usize,
    pub safe_count: usize,
    pub hazard_count: usize,
}

/// Accumulated knowledge about one board: which cells were revealed, which
/// are proven safe or hazardous, and the open constraints tying the rest
/// together.
///
/// Every `record` call drives propagation to a fixpoint before returning, so
/// callers never observe partially-propagated state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    size: GridSize,
    moves_made: BTreeSet<Cell>,
    safe: BTreeSet<Cell>,
    hazard: BTreeSet<Cell>,
    constraints: Vec<Constraint>,
}

impl KnowledgeBase {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            moves_made: BTreeSet::new(),
            safe: BTreeSet::new(),
            hazard: BTreeSet::new(),
            constraints: Vec::new(),
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safe_cells(&self) -> &BTreeSet<Cell> {
        &self.safe
    }

    pub fn hazard_cells(&self) -> &BTreeSet<Cell> {
        &self.hazard
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn stats(&self) -> KnowledgeStats {
        KnowledgeStats {
            constraint_count: self.constraints.len(),
            revealed_count: self.moves_made.len(),
            safe_count: self.safe.len(),
            hazard_count: self.hazard.len(),
        }
    }

    /// Ingests one oracle observation: `cell` was revealed hazard-free with
    /// `neighbor_hazards` hazards among its in-bounds neighbors. The new
    /// constraint is stored over the raw neighborhood; propagation narrows it
    /// against everything already known.
    pub fn record(&mut self, cell: Cell, neighbor_hazards: u8) {
        self.moves_made.insert(cell);
        self.mark_safe(cell);

        let neighborhood = neighbors(cell, self.size);
        self.constraints
            .push(Constraint::new(neighborhood, neighbor_hazards.into()));

        self.propagate();
    }

    /// Records `cell` as a proven hazard and pushes the fact into every
    /// constraint. Returns whether the fact was new.
    pub fn mark_hazard(&mut self, cell: Cell) -> bool {
        debug_assert!(
            !self.safe.contains(&cell),
            "cell proven both safe and hazardous"
        );
        let learned = self.hazard.insert(cell);
        if learned {
            for constraint in &mut self.constraints {
                constraint.mark_hazard(cell);
            }
        }
        learned
    }

    /// Records `cell` as proven safe and pushes the fact into every
    /// constraint. Returns whether the fact was new.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        debug_assert!(
            !self.hazard.contains(&cell),
            "cell proven both safe and hazardous"
        );
        let learned = self.safe.insert(cell);
        if learned {
            for constraint in &mut self.constraints {
                constraint.mark_safe(cell);
            }
        }
        learned
    }

    /// Runs narrowing, fact extraction, and subset resolution in a cycle
    /// until one full pass changes nothing.
    ///
    /// Termination: facts only accumulate over a finite cell universe, and
    /// every derived constraint is either structurally new or rejected, so
    /// the number of distinct constraints is bounded.
    fn propagate(&mut self) {
        loop {
            let mut changed = self.apply_known_facts();
            changed |= self.extract_facts();
            changed |= self.resolve_subsets();
            self.constraints.retain(|constraint| !constraint.is_vacuous());
            if !changed {
                break;
            }
        }
    }

    /// Narrows every constraint by the facts already proven. Constraints are
    /// stored raw at creation, so this is where older knowledge catches up
    /// with them.
    fn apply_known_facts(&mut self) -> bool {
        let mut changed = false;

        for constraint in &mut self.constraints {
            let hazards: Vec<Cell> = constraint
                .cells()
                .intersection(&self.hazard)
                .copied()
                .collect();
            for cell in hazards {
                constraint.mark_hazard(cell);
                changed = true;
            }

            let safes: Vec<Cell> = constraint
                .cells()
                .intersection(&self.safe)
                .copied()
                .collect();
            for cell in safes {
                constraint.mark_safe(cell);
                changed = true;
            }
        }

        changed
    }

    /// Extracts the cells each constraint proves outright and promotes them
    /// to global facts.
    fn extract_facts(&mut self) -> bool {
        let mut hazards = BTreeSet::new();
        let mut safes = BTreeSet::new();

        for constraint in &self.constraints {
            hazards.extend(constraint.known_hazards());
            safes.extend(constraint.known_safe());
        }

        let mut changed = false;
        for cell in hazards {
            changed |= self.mark_hazard(cell);
        }
        for cell in safes {
            changed |= self.mark_safe(cell);
        }
        changed
    }

    /// Pairwise subset resolution: whenever one constraint's cells sit
    /// entirely inside another's, their difference forms a new constraint.
    /// Structural duplicates are suppressed, which bounds the loop.
    fn resolve_subsets(&mut self) -> bool {
        let mut derived: Vec<Constraint> = Vec::new();

        for (i, smaller) in self.constraints.iter().enumerate() {
            if smaller.is_vacuous() {
                continue;
            }
            for (j, larger) in self.constraints.iter().enumerate() {
                if i == j || !smaller.is_subset_of(larger) {
                    continue;
                }

                let candidate = smaller.resolve_with(larger);
                if candidate.is_vacuous() {
                    continue;
                }
                if self.constraints.contains(&candidate) || derived.contains(&candidate) {
                    continue;
                }
                derived.push(candidate);
            }
        }

        let changed = !derived.is_empty();
        self.constraints.extend(derived);
        changed
    }
}
