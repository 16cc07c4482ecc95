//! Packed board storage for NybbleLife.
//!
//! The buffer is row-major with `rows + 2` rows of `groups_per_row` words:
//! one dead border row above and below the grid, and one trailing all-dead
//! padding group per row. Border rows and padding groups are never written
//! by the kernel.

use std::fmt;

use rand::RngCore;
use rand::SeedableRng;

use super::error::LifeError;
use super::kernel::{CELLS_PER_GROUP, HISTORY_MASK, LANE_BITS, LOW_BIT_MASK, tail_lane_mask};

/// Logical grid shape, validated at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    rows: usize,
    cols: usize,
}

impl Dimensions {
    /// 2^10 x 2^11 cells.
    pub const REFERENCE: Dimensions = Dimensions {
        rows: 1 << 10,
        cols: 1 << 11,
    };

    pub fn new(rows: usize, cols: usize) -> Result<Self, LifeError> {
        if rows == 0 {
            return Err(LifeError::ZeroRows);
        }
        if cols == 0 {
            return Err(LifeError::ZeroColumns);
        }
        let groups_per_row = cols.div_ceil(CELLS_PER_GROUP) + 1;
        let fits = rows
            .checked_add(2)
            .and_then(|padded| padded.checked_mul(groups_per_row))
            .is_some_and(|words| words <= isize::MAX as usize / size_of::<u64>());
        if !fits {
            return Err(LifeError::TooLarge { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Real groups plus the trailing padding group.
    #[inline]
    pub fn groups_per_row(&self) -> usize {
        self.real_groups() + 1
    }

    #[inline]
    fn real_groups(&self) -> usize {
        self.cols.div_ceil(CELLS_PER_GROUP)
    }

    /// Length of the packed buffer in words.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        (self.rows + 2) * self.groups_per_row()
    }

    #[inline]
    pub(crate) fn tail_mask(&self) -> u64 {
        tail_lane_mask(self.cols)
    }
}

/// Word index and lane shift of an interior cell.
#[inline]
fn locate(dims: &Dimensions, row: usize, col: usize) -> (usize, u32) {
    let index = (row + 1) * dims.groups_per_row() + col / CELLS_PER_GROUP;
    let lane = (CELLS_PER_GROUP - 1 - col % CELLS_PER_GROUP) as u32;
    (index, lane * LANE_BITS)
}

/// Spread 16 random bits into bit 0 of each lane.
#[inline]
fn spread_to_lanes(mut bits: u32) -> u64 {
    let mut word = 0u64;
    for _ in 0..CELLS_PER_GROUP {
        word = (word << LANE_BITS) | (bits & 1) as u64;
        bits >>= 1;
    }
    word
}

/// A bordered, nybble-packed Life grid.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    dims: Dimensions,
    words: Vec<u64>,
}

impl Board {
    /// All-dead board.
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            words: vec![0; dims.buffer_len()],
        }
    }

    /// Every interior cell independently alive with probability 1/2.
    ///
    /// The same `seed` always produces the same board.
    pub fn random(dims: Dimensions, seed: u64) -> Self {
        let mut board = Self::new(dims);
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let groups_per_row = dims.groups_per_row();
        let last = dims.real_groups() - 1;
        let tail = dims.tail_mask();

        for row in 1..=dims.rows {
            let start = row * groups_per_row;
            for (group, word) in board.words[start..start + last + 1].iter_mut().enumerate() {
                let lanes = spread_to_lanes(rng.next_u32());
                *word = if group == last { lanes & tail } else { lanes };
            }
        }
        board
    }

    /// Adopt an externally packed buffer.
    ///
    /// The buffer must match `dims` exactly, keep the border, padding and
    /// tail lanes dead, and leave lane bits 2-3 clear.
    pub fn from_words(dims: Dimensions, words: Vec<u64>) -> Result<Self, LifeError> {
        let expected = dims.buffer_len();
        if words.len() != expected {
            return Err(LifeError::BufferLength {
                expected,
                actual: words.len(),
            });
        }

        let groups_per_row = dims.groups_per_row();
        let last = dims.real_groups() - 1;
        let tail = dims.tail_mask();
        for (index, &word) in words.iter().enumerate() {
            if word & !HISTORY_MASK != 0 {
                return Err(LifeError::ReservedBits { index, word });
            }
            let row = index / groups_per_row;
            let group = index % groups_per_row;
            let dead_word = row == 0 || row == dims.rows + 1 || group > last;
            let stray = if dead_word {
                word
            } else if group == last {
                word & !tail
            } else {
                0
            };
            if stray != 0 {
                return Err(LifeError::DirtyBorder { index, word });
            }
        }

        Ok(Self { dims, words })
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    #[inline]
    pub(crate) fn words_mut(&mut self) -> &mut [u64] {
        &mut self.words
    }

    /// Current state of an interior cell; anything outside the grid is dead.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        if row >= self.dims.rows || col >= self.dims.cols {
            return false;
        }
        let (index, shift) = locate(&self.dims, row, col);
        (self.words[index] >> shift) & 1 != 0
    }

    /// Set an interior cell. History for that cell is cleared.
    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> Result<(), LifeError> {
        if row >= self.dims.rows || col >= self.dims.cols {
            return Err(LifeError::OutOfBounds {
                row,
                col,
                rows: self.dims.rows,
                cols: self.dims.cols,
            });
        }
        let (index, shift) = locate(&self.dims, row, col);
        let word = &mut self.words[index];
        *word &= !(0xF << shift);
        *word |= (alive as u64) << shift;
        Ok(())
    }

    pub fn population(&self) -> u64 {
        self.words
            .iter()
            .map(|&word| (word & LOW_BIT_MASK).count_ones() as u64)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.population() == 0
    }

    /// Visit live cells in row-major order as `(row, col)`.
    pub fn for_each_live<F: FnMut(usize, usize)>(&self, mut f: F) {
        let groups_per_row = self.dims.groups_per_row();
        for row in 0..self.dims.rows {
            let start = (row + 1) * groups_per_row;
            let real = &self.words[start..start + groups_per_row - 1];
            for (group, &word) in real.iter().enumerate() {
                let mut bits = word & LOW_BIT_MASK;
                while bits != 0 {
                    let lead = bits.leading_zeros();
                    let col = group * CELLS_PER_GROUP + (lead / LANE_BITS) as usize;
                    f(row, col);
                    bits ^= 1 << (63 - lead);
                }
            }
        }
    }

    /// Whether every border row, padding group and tail lane is dead.
    pub fn border_is_clear(&self) -> bool {
        let groups_per_row = self.dims.groups_per_row();
        let bottom = (self.dims.rows + 1) * groups_per_row;
        let tail = self.dims.tail_mask();

        let rows_clear = self.words[..groups_per_row].iter().all(|&w| w == 0)
            && self.words[bottom..].iter().all(|&w| w == 0);
        rows_clear
            && (1..=self.dims.rows).all(|row| {
                let end = (row + 1) * groups_per_row;
                self.words[end - 1] == 0 && self.words[end - 2] & !tail == 0
            })
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("rows", &self.dims.rows)
            .field("cols", &self.dims.cols)
            .field("population", &self.population())
            .finish()
    }
}

/// One line per row, `1` for a live cell and `0` for a dead one.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut line = String::with_capacity(self.dims.cols + 1);
        for row in 0..self.dims.rows {
            line.clear();
            line.extend((0..self.dims.cols).map(|col| {
                if self.is_alive(row, col) { '1' } else { '0' }
            }));
            line.push('\n');
            f.write_str(&line)?;
        }
        Ok(())
    }
}
