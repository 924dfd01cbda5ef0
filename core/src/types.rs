use ndarray::Array2;

/// Single coordinate axis used for grid height, width, and positions.
pub type Coord = u8;

/// Count type used for hazard counts and total-cell counts.
pub type CellCount = u16;

/// Grid position `(row, column)`, 0-indexed from the top-left corner.
pub type Cell = (Coord, Coord);

/// Grid dimensions `(height, width)`.
pub type GridSize = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Cell {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Cell) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Cell) -> NeighborIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        neighbors(index, size)
    }
}

/// Iterates the up-to-eight in-bounds cells adjacent to `center`.
pub fn neighbors(center: Cell, bounds: GridSize) -> NeighborIter {
    NeighborIter::new(center, bounds)
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `cell`, returning a value only when it remains in bounds.
fn apply_delta(cell: Cell, delta: (isize, isize), bounds: GridSize) -> Option<Cell> {
    let (row, col) = cell;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Cell,
    bounds: GridSize,
    index: u8,
}

impl NeighborIter {
    fn new(center: Cell, bounds: GridSize) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
