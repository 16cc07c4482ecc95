use nybble_life::{Board, Dimensions, NybbleLife, NybbleLifeConfig, Schedule};
use std::time::Instant;

fn bench(rows: usize, cols: usize, schedule: Schedule, iterations: u64) -> (f64, u64) {
    let dims = Dimensions::new(rows, cols).expect("invalid board dimensions");
    let mut engine = NybbleLife::with_config(
        Board::random(dims, 0),
        NybbleLifeConfig::default().schedule(schedule),
    )
    .expect("engine setup");

    let start = Instant::now();
    engine.step_n(iterations);
    let duration = start.elapsed();

    let total_ms = duration.as_secs_f64() * 1000.0;
    (total_ms, engine.population())
}

fn main() {
    let scales: &[(usize, usize, u64)] = &[
        (256, 512, 2000),    // fits in L2
        (1024, 2048, 500),   // reference sizing
        (2048, 4096, 100),
        (4096, 8192, 25),
        (8192, 16384, 10),
    ];

    println!(
        "{:<12} {:<11} {:>8} {:>12} {:>10}",
        "Grid", "Schedule", "Iters", "Total(ms)", "Avg(ms)"
    );
    println!("{}", "-".repeat(57));

    for &(rows, cols, iters) in scales {
        for schedule in [Schedule::Sequential, Schedule::RowParity] {
            let (total_ms, _pop) = bench(rows, cols, schedule, iters);
            let avg_ms = total_ms / iters as f64;
            println!(
                "{:<12} {:<11} {:>8} {:>12.1} {:>10.4}",
                format!("{}x{}", rows, cols),
                schedule.to_string(),
                iters,
                total_ms,
                avg_ms
            );
        }
    }
}
