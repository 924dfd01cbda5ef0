use ndarray::Array2;

use super::*;

/// Uniformly random hazard placement driven by an explicit seed, so boards
/// are reproducible across runs.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GridConfig) -> HazardField {
        use rand::prelude::*;

        let total_cells = config.total_cells();

        // optimize for full boards
        if config.hazards >= total_cells {
            if config.hazards > total_cells {
                log::warn!(
                    "Grid already full, generated anyway, requested {} but only fits {}",
                    config.hazards,
                    total_cells
                );
            }
            return HazardField::from_hazard_mask(Array2::from_elem(
                config.size.to_nd_index(),
                true,
            ));
        }

        let mut hazard_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut free_cells = total_cells;
        let mut placed = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = hazard_mask.as_slice_mut().expect("layout should be standard");
            while placed < config.hazards && free_cells > 0 {
                let mut place: CellCount = rng.random_range(0..free_cells);
                for cell in cells.iter_mut() {
                    if *cell {
                        continue;
                    }
                    if place == 0 {
                        *cell = true;
                        placed += 1;
                        free_cells -= 1;
                        break;
                    }
                    place -= 1;
                }
            }
        }

        HazardField::from_hazard_mask(hazard_mask)
    }
}
