use nybble_life::{Board, Dimensions, NybbleLife, NybbleLifeConfig, Schedule};
use std::env;
use std::time::Instant;

#[derive(Clone, Debug)]
struct BenchConfig {
    rows: usize,
    cols: usize,
    warmup: u64,
    iters: u64,
    seed: u64,
    threads: Option<usize>,
    json: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            rows: Dimensions::REFERENCE.rows(),
            cols: Dimensions::REFERENCE.cols(),
            warmup: 3,
            iters: 200,
            seed: 0,
            threads: None,
            json: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct RunResult {
    total_ms: f64,
    avg_ms: f64,
    population: u64,
    threads: usize,
}

fn parse_args() -> BenchConfig {
    let mut cfg = BenchConfig::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rows" => {
                if let Some(v) = args.next() {
                    cfg.rows = v.parse().expect("--rows expects usize");
                }
            }
            "--cols" => {
                if let Some(v) = args.next() {
                    cfg.cols = v.parse().expect("--cols expects usize");
                }
            }
            "--warmup" => {
                if let Some(v) = args.next() {
                    cfg.warmup = v.parse().expect("--warmup expects u64");
                }
            }
            "--iters" => {
                if let Some(v) = args.next() {
                    cfg.iters = v.parse().expect("--iters expects u64");
                }
            }
            "--seed" => {
                if let Some(v) = args.next() {
                    cfg.seed = if let Some(hex) = v.strip_prefix("0x") {
                        u64::from_str_radix(hex, 16).expect("--seed hex parse failed")
                    } else {
                        v.parse().expect("--seed expects u64")
                    };
                }
            }
            "--threads" => {
                if let Some(v) = args.next() {
                    cfg.threads = Some(v.parse().expect("--threads expects usize"));
                }
            }
            "--json" => {
                cfg.json = true;
            }
            other => panic!("unknown arg: {other}"),
        }
    }
    cfg
}

fn run_schedule(cfg: &BenchConfig, schedule: Schedule) -> RunResult {
    let dims = Dimensions::new(cfg.rows, cfg.cols).expect("invalid board dimensions");
    let mut config = NybbleLifeConfig::default().schedule(schedule);
    if let Some(t) = cfg.threads {
        config = config.thread_count(t);
    }
    let mut engine =
        NybbleLife::with_config(Board::random(dims, cfg.seed), config).expect("engine setup");

    if cfg.warmup > 0 {
        engine.step_n(cfg.warmup);
    }

    let start = Instant::now();
    engine.step_n(cfg.iters);
    let elapsed = start.elapsed();
    let total_ms = elapsed.as_secs_f64() * 1000.0;
    let avg_ms = total_ms / cfg.iters.max(1) as f64;

    RunResult {
        total_ms,
        avg_ms,
        population: engine.population(),
        threads: engine.thread_count(),
    }
}

fn main() {
    let cfg = parse_args();
    let sequential = run_schedule(&cfg, Schedule::Sequential);
    let parity = run_schedule(&cfg, Schedule::RowParity);
    assert_eq!(
        sequential.population, parity.population,
        "schedules diverged"
    );

    if cfg.json {
        println!(
            "{{\"rows\":{},\"cols\":{},\"warmup\":{},\"iters\":{},\"seed\":{},\"threads\":{},\"sequential\":{{\"total_ms\":{:.6},\"avg_ms\":{:.6},\"population\":{}}},\"row_parity\":{{\"total_ms\":{:.6},\"avg_ms\":{:.6},\"population\":{}}},\"speedup\":{:.6}}}",
            cfg.rows,
            cfg.cols,
            cfg.warmup,
            cfg.iters,
            cfg.seed,
            parity.threads,
            sequential.total_ms,
            sequential.avg_ms,
            sequential.population,
            parity.total_ms,
            parity.avg_ms,
            parity.population,
            sequential.avg_ms / parity.avg_ms,
        );
    } else {
        println!(
            "sequential: total_ms={:.6}, avg_ms={:.6}, population={}",
            sequential.total_ms, sequential.avg_ms, sequential.population
        );
        println!(
            "row-parity ({} threads): total_ms={:.6}, avg_ms={:.6}, population={}, speedup={:.3}x",
            parity.threads,
            parity.total_ms,
            parity.avg_ms,
            parity.population,
            sequential.avg_ms / parity.avg_ms,
        );
    }
}
