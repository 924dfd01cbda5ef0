use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use rand::prelude::*;

use crate::*;

/// Strategy for choosing among several cells that are all proven safe. The
/// choice is not correctness-relevant, so it is injected to keep callers and
/// tests in control of it.
pub trait SafePicker {
    fn pick(&mut self, candidates: &BTreeSet<Cell>) -> Option<Cell>;
}

/// Deterministic default: the first candidate in row-major order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstInOrder;

impl SafePicker for FirstInOrder {
    fn pick(&mut self, candidates: &BTreeSet<Cell>) -> Option<Cell> {
        candidates.first().copied()
    }
}

/// The player: feeds oracle observations into its knowledge base and answers
/// move requests from the proven facts. Known-safe moves always take priority
/// over random ones.
#[derive(Clone, Debug)]
pub struct Agent<P = FirstInOrder> {
    config: GridConfig,
    knowledge: KnowledgeBase,
    rng: SmallRng,
    picker: P,
}

impl Agent<FirstInOrder> {
    pub fn new(config: GridConfig, seed: u64) -> Self {
        Self::with_picker(config, seed, FirstInOrder)
    }
}

impl<P: SafePicker> Agent<P> {
    pub fn with_picker(config: GridConfig, seed: u64, picker: P) -> Self {
        Self {
            config,
            knowledge: KnowledgeBase::new(config.size),
            rng: SmallRng::seed_from_u64(seed),
            picker,
        }
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Ingests one oracle report: `cell` is hazard-free and has
    /// `neighbor_hazards` hazards adjacent. Runs deduction to a fixpoint
    /// before returning.
    pub fn record(&mut self, cell: Cell, neighbor_hazards: u8) -> Result<()> {
        let (height, width) = self.config.size;
        if cell.0 >= height || cell.1 >= width {
            return Err(GridError::InvalidCell);
        }
        self.knowledge.record(cell, neighbor_hazards);
        Ok(())
    }

    /// A cell proven safe that has not been played yet, or `None`.
    pub fn next_known_safe_move(&mut self) -> Option<Cell> {
        let candidates: BTreeSet<Cell> = self
            .knowledge
            .safe_cells()
            .difference(self.knowledge.moves_made())
            .copied()
            .collect();
        self.picker.pick(&candidates)
    }

    /// A uniformly random cell that was neither played nor proven hazardous,
    /// or `None`. Cells merely not-yet-proven-safe stay eligible.
    pub fn next_random_move(&mut self) -> Option<Cell> {
        let (height, width) = self.config.size;
        let candidates: Vec<Cell> = (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .filter(|cell| {
                !self.knowledge.moves_made().contains(cell)
                    && !self.knowledge.hazard_cells().contains(cell)
            })
            .collect();

        if candidates.is_empty() {
            None
        } else {
            Some(candidates[self.rng.random_range(0..candidates.len())])
        }
    }

    /// The agent's documented move policy: known-safe first, else random.
    pub fn request_move(&mut self) -> Option<Cell> {
        self.next_known_safe_move()
            .or_else(|| self.next_random_move())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: GridSize, hazards: CellCount) -> GridConfig {
        GridConfig::new(size, hazards).unwrap()
    }

    #[test]
    fn construction_rejects_bad_configs() {
        assert_eq!(GridConfig::new((0, 8), 1), Err(GridError::EmptyGrid));
        assert_eq!(GridConfig::new((8, 0), 1), Err(GridError::EmptyGrid));
        assert_eq!(GridConfig::new((8, 8), 0), Err(GridError::NoHazards));
        assert_eq!(GridConfig::new((3, 3), 10), Err(GridError::TooManyHazards));
        assert!(GridConfig::new((3, 3), 9).is_ok());
    }

    #[test]
    fn record_rejects_out_of_bounds_cells() {
        let mut agent = Agent::new(config((2, 2), 1), 0);

        assert_eq!(agent.record((2, 0), 0), Err(GridError::InvalidCell));
        assert_eq!(agent.record((0, 2), 0), Err(GridError::InvalidCell));
        assert!(agent.record((1, 1), 1).is_ok());
    }

    #[test]
    fn safe_move_prefers_unplayed_proven_cells() {
        let mut agent = Agent::new(config((4, 4), 1), 0);

        agent.record((1, 1), 0).unwrap();

        // (1, 1) is played; the picker sees the remaining eight safe cells.
        assert_eq!(agent.next_known_safe_move(), Some((0, 0)));
    }

    #[test]
    fn safe_move_is_none_without_proof() {
        let mut agent = Agent::new(config((3, 3), 1), 0);

        assert_eq!(agent.next_known_safe_move(), None);

        agent.record((0, 0), 1).unwrap();
        assert_eq!(agent.next_known_safe_move(), None);
    }

    #[test]
    fn safe_move_does_not_mutate_knowledge() {
        let mut agent = Agent::new(config((4, 4), 1), 0);
        agent.record((1, 1), 0).unwrap();

        let before = agent.knowledge().clone();
        agent.next_known_safe_move();

        assert_eq!(agent.knowledge(), &before);
    }

    #[test]
    fn random_move_avoids_played_and_hazardous_cells() {
        let mut agent = Agent::new(config((2, 2), 2), 7);

        agent.record((1, 0), 2).unwrap();
        agent.record((1, 1), 2).unwrap();

        // Both remaining cells are proven hazards; nothing is playable.
        assert_eq!(agent.next_random_move(), None);
        assert_eq!(agent.request_move(), None);
    }

    #[test]
    fn random_move_ignores_safety_proofs() {
        let mut agent = Agent::new(config((1, 2), 1), 3);

        agent.record((0, 0), 1).unwrap();

        // (0, 1) is the proven hazard, (0, 0) is played: no move left even
        // though nothing besides (0, 0) was ever proven safe.
        assert_eq!(agent.next_random_move(), None);
    }

    #[test]
    fn request_move_prioritizes_safe_over_random() {
        // Hazard at (3, 3); revealing (1, 1) proves its whole neighborhood
        // safe, so the next eight requests must all come from the safe set.
        let mut agent = Agent::new(config((4, 4), 1), 11);

        agent.record((1, 1), 0).unwrap();

        for _ in 0..8 {
            let cell = agent.request_move().expect("safe cells remain");
            assert!(agent.knowledge().safe_cells().contains(&cell));
            let count = u8::from(cell == (2, 2));
            agent.record(cell, count).unwrap();
        }
    }

    #[test]
    fn safe_moves_run_dry_once_every_safe_cell_is_played() {
        // Hazard at (2, 2); after all eight safe cells are recorded, the
        // safe set is exhausted and only the proven hazard remains unplayed.
        let observations: [(Cell, u8); 8] = [
            ((0, 0), 0),
            ((0, 1), 0),
            ((0, 2), 0),
            ((1, 0), 0),
            ((1, 1), 1),
            ((1, 2), 1),
            ((2, 0), 0),
            ((2, 1), 1),
        ];
        let mut agent = Agent::new(config((3, 3), 1), 0);

        for (cell, count) in observations {
            agent.record(cell, count).unwrap();
        }

        assert_eq!(agent.next_known_safe_move(), None);
        assert_eq!(agent.next_random_move(), None);
        assert_eq!(agent.request_move(), None);
    }

    #[test]
    fn picker_injection_controls_selection() {
        struct LastInOrder;
        impl SafePicker for LastInOrder {
            fn pick(&mut self, candidates: &BTreeSet<Cell>) -> Option<Cell> {
                candidates.last().copied()
            }
        }

        let mut agent = Agent::with_picker(config((4, 4), 1), 0, LastInOrder);
        agent.record((1, 1), 0).unwrap();

        assert_eq!(agent.next_known_safe_move(), Some((2, 2)));
    }
}
