#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use nybble_life::{Board, Dimensions, NybbleLife, NybbleLifeConfig, ReferenceLife, Schedule};
use tracing_subscriber::EnvFilter;

/// Run Conway's Game of Life on a fixed, dead-bordered grid.
#[derive(Parser, Debug)]
#[command(name = "nybble-life", version)]
struct Cli {
    /// Number of generations to compute.
    generations: u64,
    /// 1 to print the board before and after the run, 0 to skip printing.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=1))]
    print: u8,
    /// Grid height in cells.
    #[arg(long, default_value_t = Dimensions::REFERENCE.rows())]
    rows: usize,
    /// Grid width in cells.
    #[arg(long, default_value_t = Dimensions::REFERENCE.cols())]
    cols: usize,
    /// Seed for the initial random board.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Worker threads (default: auto-detect).
    #[arg(long)]
    threads: Option<usize>,
    /// Upper bound on worker threads.
    #[arg(long)]
    max_threads: Option<usize>,
    /// Row scheduling: sequential or row-parity.
    #[arg(long, default_value_t = Schedule::RowParity)]
    schedule: Schedule,
    /// Also run the naive reference simulator and compare the results.
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn config(&self) -> NybbleLifeConfig {
        let mut config = NybbleLifeConfig::default().schedule(self.schedule);
        if let Some(n) = self.threads {
            config = config.thread_count(n);
        }
        if let Some(n) = self.max_threads {
            config = config.max_threads(n);
        }
        config
    }
}

fn print_board(board: &Board) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    write!(out, "{board}")?;
    out.flush()
}

fn collect_live<F>(visit: F) -> Vec<(usize, usize)>
where
    F: FnOnce(&mut dyn FnMut(usize, usize)),
{
    let mut out = Vec::new();
    visit(&mut |row, col| out.push((row, col)));
    out
}

fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    let dims = Dimensions::new(cli.rows, cli.cols)?;
    let board = Board::random(dims, cli.seed);
    let mut reference = cli.check.then(|| ReferenceLife::from_board(&board));
    let print = cli.print == 1;

    if print {
        print_board(&board)?;
    }

    let mut engine = NybbleLife::with_config(board, cli.config())?;
    tracing::info!(
        rows = dims.rows(),
        cols = dims.cols(),
        generations = cli.generations,
        threads = engine.thread_count(),
        schedule = %engine.schedule(),
        "starting run"
    );

    let start = Instant::now();
    engine.step_n(cli.generations);
    let elapsed = start.elapsed();

    let total_ms = elapsed.as_secs_f64() * 1000.0;
    let avg_ms = total_ms / cli.generations.max(1) as f64;
    tracing::info!(
        total_ms,
        per_generation_ms = avg_ms,
        population = engine.population(),
        "run complete"
    );

    let mut matched = true;
    if let Some(reference) = reference.as_mut() {
        reference.step(cli.generations);
        let packed = collect_live(|f| engine.for_each_live(f));
        let naive = collect_live(|f| reference.for_each_live(f));
        matched = packed == naive;
        if matched {
            tracing::info!(population = reference.population(), "reference check: MATCH");
        } else {
            tracing::error!(
                packed = packed.len(),
                reference = naive.len(),
                "reference check: MISMATCH"
            );
        }
    }

    if print {
        print_board(engine.board())?;
    }
    Ok(matched)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
