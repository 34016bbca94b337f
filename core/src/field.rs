use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fixed-size grid of cells, indexed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldSnapshot")]
pub struct Field {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

/// Unchecked wire form of [`Field`], counters and adjacency are rebuilt on load.
#[derive(Deserialize)]
struct FieldSnapshot {
    cells: Array2<Cell>,
}

impl TryFrom<FieldSnapshot> for Field {
    type Error = GameError;

    fn try_from(snapshot: FieldSnapshot) -> Result<Self> {
        Self::from_cells(snapshot.cells)
    }
}

impl Field {
    /// Empty field without any mines. Callers guarantee a non-empty `size`.
    pub(crate) fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    /// Field with mines at exactly the given coordinates and adjacency counts
    /// already computed. Duplicates are only counted once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidConfiguration {
                size,
                mines: mine_coords.len().try_into().unwrap_or(CellCount::MAX),
            });
        }

        let mut field = Self::new(size);
        for &coords in mine_coords {
            field.place_mine(coords)?;
        }
        field.compute_adjacency();
        Ok(field)
    }

    /// Rebuilds a field from raw cells, recounting mines and recomputing
    /// adjacency. Rejects empty or oversized grids and flagged revealed cells.
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let (x, y) = cells.dim();
        let max = usize::from(Coord::MAX);
        if x == 0 || y == 0 || x > max || y > max {
            return Err(GameError::InvalidBoardShape);
        }
        if cells.iter().any(|cell| cell.is_revealed() && cell.is_flagged()) {
            return Err(GameError::InvalidCellState);
        }

        let mine_count = cells.iter().filter(|cell| cell.is_mine()).count();
        let mut field = Self {
            cells,
            // at most 255 * 255 cells
            mine_count: mine_count as CellCount,
        };
        field.compute_adjacency();
        Ok(field)
    }

    pub fn size(&self) -> Coord2 {
        let (x, y) = self.cells.dim();
        // dimensions come from a Coord2 so they always fit
        (x as Coord, y as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (x, y) = self.size();
        mult(x, y)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let (size_x, size_y) = self.size();
        coords.0 < size_x && coords.1 < size_y
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[coords.to_nd_index()])
    }

    pub(crate) fn get_mut(&mut self, coords: Coord2) -> Result<&mut Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&mut self.cells[coords.to_nd_index()])
    }

    /// Neighbors that actually exist, edges and corners simply have fewer.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count();
        // at most 8 neighbors
        count as u8
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((x, y), cell)| ((x as Coord, y as Coord), cell))
    }

    /// Mines every cell for which `is_mine` holds, then runs the adjacency pass.
    pub(crate) fn fill_mines(&mut self, is_mine: impl Fn(Coord2) -> bool) {
        for ((x, y), cell) in self.cells.indexed_iter_mut() {
            if is_mine((x as Coord, y as Coord)) && cell.place_mine() {
                self.mine_count += 1;
            }
        }
        self.compute_adjacency();
    }

    pub(crate) fn place_mine(&mut self, coords: Coord2) -> Result<bool> {
        let placed = self.get_mut(coords)?.place_mine();
        if placed {
            self.mine_count += 1;
        }
        Ok(placed)
    }

    /// One-time pass run after all mines are placed.
    pub(crate) fn compute_adjacency(&mut self) {
        let counts = Array2::from_shape_fn(self.cells.dim(), |(x, y)| {
            self.adjacent_mine_count((x as Coord, y as Coord))
        });
        for (cell, count) in self.cells.iter_mut().zip(counts.iter()) {
            cell.set_adjacent_mines(*count);
        }
    }
}

impl Index<Coord2> for Field {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
