#![no_std]

extern crate alloc;

use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use agent::*;
pub use error::*;
pub use generator::*;
pub use inference::*;
pub use session::*;
pub use types::*;

mod agent;
mod error;
mod generator;
mod inference;
mod session;
mod types;

/// Grid dimensions and hazard count, fixed for the lifetime of a board.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub size: GridSize,
    pub hazards: CellCount,
}

impl GridConfig {
    pub const fn new_unchecked(size: GridSize, hazards: CellCount) -> Self {
        Self { size, hazards }
    }

    /// Validates the configuration up front: positive dimensions and a hazard
    /// count that fits on the grid.
    pub fn new((height, width): GridSize, hazards: CellCount) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(GridError::EmptyGrid);
        }
        if hazards == 0 {
            return Err(GridError::NoHazards);
        }
        if hazards > mult(height, width) {
            return Err(GridError::TooManyHazards);
        }
        Ok(Self::new_unchecked((height, width), hazards))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new_unchecked((8, 8), 8)
    }
}

/// Ground-truth hazard placement. Acts as the oracle: it knows where every
/// hazard sits and can report the neighbor count for any cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardField {
    hazard_mask: Array2<bool>,
    hazard_count: CellCount,
}

impl HazardField {
    pub fn from_hazard_mask(hazard_mask: Array2<bool>) -> Self {
        let hazard_count = hazard_mask
            .iter()
            .filter(|&&is_hazard| is_hazard)
            .count()
            .try_into()
            .unwrap();
        Self {
            hazard_mask,
            hazard_count,
        }
    }

    pub fn from_hazard_coords(size: GridSize, hazard_coords: &[Cell]) -> Result<Self> {
        let mut hazard_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &cell in hazard_coords {
            if cell.0 >= size.0 || cell.1 >= size.1 {
                return Err(GridError::InvalidCell);
            }
            hazard_mask[cell.to_nd_index()] = true;
        }

        Ok(Self::from_hazard_mask(hazard_mask))
    }

    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            size: self.size(),
            hazards: self.hazard_count,
        }
    }

    pub fn validate_cell(&self, cell: Cell) -> Result<Cell> {
        let size = self.size();
        if cell.0 < size.0 && cell.1 < size.1 {
            Ok(cell)
        } else {
            Err(GridError::InvalidCell)
        }
    }

    pub fn size(&self) -> GridSize {
        let dim = self.hazard_mask.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.hazard_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.hazard_mask.len().try_into().unwrap()
    }

    pub fn hazard_count(&self) -> CellCount {
        self.hazard_count
    }

    pub fn contains_hazard(&self, cell: Cell) -> bool {
        self[cell]
    }

    /// Number of hazards among the up-to-eight in-bounds neighbors of `cell`.
    pub fn neighbor_hazard_count(&self, cell: Cell) -> u8 {
        self.hazard_mask
            .iter_neighbors(cell)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }
}

impl Index<Cell> for HazardField {
    type Output = bool;

    fn index(&self, (row, col): Cell) -> &Self::Output {
        &self.hazard_mask[(row as usize, col as usize)]
    }
}

impl IndexMut<Cell> for HazardField {
    fn index_mut(&mut self, (row, col): Cell) -> &mut Self::Output {
        &mut self.hazard_mask[(row as usize, col as usize)]
    }
}
