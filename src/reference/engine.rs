//! ReferenceLife engine core.

use crate::nybblelife::{Board, Dimensions, LifeError};

/// B3/S23 for one cell.
#[inline]
fn next_alive(alive: bool, neighbors: u8) -> bool {
    if alive {
        neighbors == 2 || neighbors == 3
    } else {
        neighbors == 3
    }
}

pub struct ReferenceLife {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
    next: Vec<bool>,
    generation: u64,
}

impl ReferenceLife {
    pub fn new(dims: Dimensions) -> Self {
        let len = dims.rows() * dims.cols();
        Self {
            rows: dims.rows(),
            cols: dims.cols(),
            cells: vec![false; len],
            next: vec![false; len],
            generation: 0,
        }
    }

    /// Copy the live cells of a packed board.
    pub fn from_board(board: &Board) -> Self {
        let mut engine = Self::new(board.dimensions());
        let cols = engine.cols;
        board.for_each_live(|row, col| engine.cells[row * cols + col] = true);
        engine
    }

    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> Result<(), LifeError> {
        if row >= self.rows || col >= self.cols {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.cells[row * self.cols + col] = alive;
        Ok(())
    }

    /// Cells outside the grid are dead; there is no wraparound.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for r in row.saturating_sub(1)..=(row + 1).min(self.rows - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(self.cols - 1) {
                if (r, c) != (row, col) && self.cells[r * self.cols + c] {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn step(&mut self, generations: u64) {
        for _ in 0..generations {
            for row in 0..self.rows {
                for col in 0..self.cols {
                    let alive = self.cells[row * self.cols + col];
                    self.next[row * self.cols + col] =
                        next_alive(alive, self.live_neighbors(row, col));
                }
            }
            std::mem::swap(&mut self.cells, &mut self.next);
            self.generation += 1;
        }
    }

    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|&&alive| alive).count() as u64
    }

    /// Visit live cells in row-major order as `(row, col)`.
    pub fn for_each_live<F: FnMut(usize, usize)>(&self, mut f: F) {
        for (index, _) in self.cells.iter().enumerate().filter(|(_, alive)| **alive) {
            f(index / self.cols, index % self.cols);
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
