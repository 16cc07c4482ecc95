use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::board::Board;
use super::error::LifeError;
use super::kernel::{RowReads, advance_row};
use super::sync::{SendPtr, row_window, row_window_raw};

/// Rows handed to a rayon task at a time in parallel passes.
const PARALLEL_ROWS_PER_TASK_MIN: usize = 8;

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

/// How one generation is split into row updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Schedule {
    /// Rows top to bottom on the calling thread.
    Sequential,
    /// Odd rows in parallel, then even rows in parallel.
    ///
    /// A pass never reads a row it writes: odd rows only neighbour even rows
    /// and vice versa. Pass one reads untouched neighbours through bit 0,
    /// pass two reads the already advanced neighbours through bit 1.
    #[default]
    RowParity,
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Schedule::Sequential => "sequential",
            Schedule::RowParity => "row-parity",
        })
    }
}

impl FromStr for Schedule {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "serial" => Ok(Schedule::Sequential),
            "row-parity" | "parity" | "parallel" => Ok(Schedule::RowParity),
            _ => Err(LifeError::UnknownSchedule(s.to_owned())),
        }
    }
}

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

#[inline]
fn auto_pool_thread_count_for_physical(physical: usize) -> usize {
    let physical = physical.max(1);
    if physical <= 8 {
        physical
    } else {
        physical.div_ceil(2).max(6)
    }
}

/// Resolve the thread count from a config, falling back to auto-detect.
fn resolve_thread_count(config: &NybbleLifeConfig) -> usize {
    let mut threads = config
        .thread_count
        .unwrap_or_else(|| auto_pool_thread_count_for_physical(physical_core_count()));
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

/// One generation, rows in order. Conformance baseline for every schedule.
fn step_sequential(board: &mut Board) {
    let rows = board.rows();
    let groups_per_row = board.dimensions().groups_per_row();
    let tail = board.dimensions().tail_mask();
    let words = board.words_mut();

    for row in 1..=rows {
        let (above, current, below) = row_window(words, groups_per_row, row);
        advance_row(above, current, below, RowReads::TOP_DOWN, tail);
    }
}

/// One generation as two race-free parallel passes.
fn step_row_parity(board: &mut Board) {
    let rows = board.rows();
    let groups_per_row = board.dimensions().groups_per_row();
    let tail = board.dimensions().tail_mask();
    let base = SendPtr::new(board.words_mut().as_mut_ptr());

    let passes = [
        (1usize, RowReads::UNTOUCHED_NEIGHBORS),
        (2usize, RowReads::ADVANCED_NEIGHBORS),
    ];
    for (first_row, reads) in passes {
        if first_row > rows {
            continue;
        }
        let count = (rows - first_row) / 2 + 1;
        (0..count)
            .into_par_iter()
            .with_min_len(PARALLEL_ROWS_PER_TASK_MIN)
            .for_each(|k| {
                let row = first_row + 2 * k;
                // SAFETY: the buffer holds `rows + 2` rows and `row <= rows`.
                // Rows written in this pass share `row`'s parity; the rows
                // read are of the other parity or dead borders, and nothing
                // writes them until the pass ends.
                let (above, current, below) =
                    unsafe { row_window_raw(base.get(), groups_per_row, row) };
                advance_row(above, current, below, reads, tail);
            });
    }
}

#[inline]
fn run_generation(board: &mut Board, schedule: Schedule) {
    match schedule {
        Schedule::Sequential => step_sequential(board),
        Schedule::RowParity => step_row_parity(board),
    }
    debug_assert!(board.border_is_clear());
}

/// Advance a board by one generation.
///
/// Pure step boundary: consumes one state and returns the next, on the
/// calling thread.
pub fn advance(mut board: Board) -> Board {
    step_sequential(&mut board);
    board
}

/// Configuration for a NybbleLife engine instance.
///
/// Use `NybbleLifeConfig::default()` for auto-tuned defaults, or customise
/// individual knobs via the builder methods.
#[derive(Clone, Debug, Default)]
pub struct NybbleLifeConfig {
    /// Number of threads for the compute pool.
    /// `None` means auto-detect (physical cores, memory-bandwidth capped).
    pub thread_count: Option<usize>,
    /// Hard upper bound on threads regardless of auto-detection.
    pub max_threads: Option<usize>,
    pub schedule: Schedule,
}

impl NybbleLifeConfig {
    /// Set an explicit thread count for the compute pool.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    /// Set a hard upper bound on threads.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    pub fn schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }
}

/// A board plus the thread pool and schedule that advance it.
pub struct NybbleLife {
    board: Board,
    generation: u64,
    pool: rayon::ThreadPool,
    threads: usize,
    schedule: Schedule,
}

impl NybbleLife {
    pub fn new(board: Board) -> Result<Self, LifeError> {
        Self::with_config(board, NybbleLifeConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(board: Board, config: NybbleLifeConfig) -> Result<Self, LifeError> {
        let threads = resolve_thread_count(&config);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("nybble-life-{i}"))
            .build()?;

        tracing::debug!(
            rows = board.rows(),
            cols = board.cols(),
            threads,
            schedule = %config.schedule,
            "engine ready"
        );

        Ok(Self {
            board,
            generation: 0,
            pool,
            threads,
            schedule: config.schedule,
        })
    }

    pub fn step(&mut self) {
        self.step_n(1);
    }

    pub fn step_n(&mut self, n: u64) {
        let Self {
            board,
            pool,
            schedule,
            ..
        } = self;
        let schedule = *schedule;
        match schedule {
            Schedule::Sequential => {
                for _ in 0..n {
                    run_generation(board, schedule);
                }
            }
            Schedule::RowParity => pool.install(|| {
                for _ in 0..n {
                    run_generation(board, schedule);
                }
            }),
        }
        self.generation += n;
        tracing::trace!(steps = n, generation = self.generation, "advanced");
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.board.is_alive(row, col)
    }

    pub fn population(&self) -> u64 {
        self.board.population()
    }

    pub fn for_each_live<F: FnMut(usize, usize)>(&self, f: F) {
        self.board.for_each_live(f);
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};

    use super::{
        NybbleLife, NybbleLifeConfig, Schedule, advance, auto_pool_thread_count_for_physical,
        resolve_thread_count, step_row_parity, step_sequential,
    };
    use crate::nybblelife::board::{Board, Dimensions};

    #[test]
    fn auto_pool_thread_count_targets_bandwidth_sweet_spot() {
        assert_eq!(auto_pool_thread_count_for_physical(0), 1);
        assert_eq!(auto_pool_thread_count_for_physical(1), 1);
        assert_eq!(auto_pool_thread_count_for_physical(4), 4);
        assert_eq!(auto_pool_thread_count_for_physical(8), 8);
        assert_eq!(auto_pool_thread_count_for_physical(9), 6);
        assert_eq!(auto_pool_thread_count_for_physical(16), 8);
        assert_eq!(auto_pool_thread_count_for_physical(24), 12);
    }

    #[test]
    fn thread_count_respects_cap() {
        let config = NybbleLifeConfig::default().thread_count(12).max_threads(3);
        assert_eq!(resolve_thread_count(&config), 3);
        let config = NybbleLifeConfig::default().thread_count(0);
        assert_eq!(resolve_thread_count(&config), 1);
        assert!(resolve_thread_count(&NybbleLifeConfig::default()) >= 1);
    }

    #[test]
    fn schedule_parses_and_displays() {
        assert_eq!("sequential".parse::<Schedule>().unwrap(), Schedule::Sequential);
        assert_eq!("Row-Parity".parse::<Schedule>().unwrap(), Schedule::RowParity);
        assert!("diagonal".parse::<Schedule>().is_err());
        for schedule in [Schedule::Sequential, Schedule::RowParity] {
            assert_eq!(schedule.to_string().parse::<Schedule>().unwrap(), schedule);
        }
    }

    #[test]
    fn parity_passes_match_sequential_sweep() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x0DD5_EE55);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .expect("build thread pool");
        for _ in 0..64 {
            let rows = rng.random_range(1..48);
            let cols = rng.random_range(1..80);
            let dims = Dimensions::new(rows, cols).unwrap();
            let mut sequential = Board::random(dims, rng.random());
            let mut parallel = sequential.clone();
            for _ in 0..4 {
                step_sequential(&mut sequential);
                pool.install(|| step_row_parity(&mut parallel));
                assert_eq!(sequential, parallel, "{rows}x{cols}");
            }
        }
    }

    #[test]
    fn advance_leaves_input_untouched() {
        let dims = Dimensions::new(16, 16).unwrap();
        let start = Board::random(dims, 3);
        let next = advance(start.clone());
        let mut engine = NybbleLife::with_config(
            start.clone(),
            NybbleLifeConfig::default().schedule(Schedule::Sequential),
        )
        .unwrap();
        engine.step();
        assert_eq!(engine.board(), &next);
        assert_eq!(engine.generation(), 1);
        assert_ne!(start, next);
    }

    #[test]
    fn single_row_board_skips_even_pass() {
        let dims = Dimensions::new(1, 5).unwrap();
        let mut board = Board::new(dims);
        for col in 1..4 {
            board.set_cell(0, col, true).unwrap();
        }
        let mut engine =
            NybbleLife::with_config(board, NybbleLifeConfig::default().thread_count(2)).unwrap();
        engine.step();
        let mut live = Vec::new();
        engine.for_each_live(|row, col| live.push((row, col)));
        assert_eq!(live, [(0, 2)]);
        engine.step();
        assert_eq!(engine.population(), 0);
    }
}
