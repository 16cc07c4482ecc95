//! Error type shared by board construction and engine setup.

use thiserror::Error;

/// Failures detected at construction or at the board boundary.
///
/// The update loop itself has no failure modes; anything that can go wrong
/// is rejected here before the first generation runs.
#[derive(Debug, Error)]
pub enum LifeError {
    #[error("grid must have at least one row")]
    ZeroRows,
    #[error("grid must have at least one column")]
    ZeroColumns,
    #[error("grid of {rows}x{cols} cells does not fit in addressable memory")]
    TooLarge { rows: usize, cols: usize },
    #[error("packed buffer holds {actual} words, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("word {index} lies in the dead border or padding but is {word:#018x}")]
    DirtyBorder { index: usize, word: u64 },
    #[error("word {index} has reserved lane bits set: {word:#018x}")]
    ReservedBits { index: usize, word: u64 },
    #[error("cell ({row},{col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("unknown schedule {0:?} (expected sequential or row-parity)")]
    UnknownSchedule(String),
    #[error("failed to build compute thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
