use nybble_life::{Board, Dimensions, NybbleLife, NybbleLifeConfig, Schedule};

const SCHEDULES: [Schedule; 2] = [Schedule::Sequential, Schedule::RowParity];

fn engine_with(rows: usize, cols: usize, cells: &[(usize, usize)], schedule: Schedule) -> NybbleLife {
    let mut board = Board::new(Dimensions::new(rows, cols).unwrap());
    for &(row, col) in cells {
        board.set_cell(row, col, true).unwrap();
    }
    NybbleLife::with_config(
        board,
        NybbleLifeConfig::default().thread_count(4).schedule(schedule),
    )
    .unwrap()
}

fn collect_live(engine: &NybbleLife) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    engine.for_each_live(|row, col| out.push((row, col)));
    out
}

fn assert_alive(engine: &NybbleLife, cells: &[(usize, usize)]) {
    for &(row, col) in cells {
        assert!(engine.is_alive(row, col), "expected alive at ({row},{col})");
    }
}

#[test]
fn block_is_stable() {
    let block = [(5, 15), (5, 16), (6, 15), (6, 16)];
    for schedule in SCHEDULES {
        let mut engine = engine_with(12, 32, &block, schedule);
        for _ in 0..25 {
            engine.step();
            assert_eq!(collect_live(&engine), block, "{schedule}");
        }
    }
}

#[test]
fn blinker_oscillates() {
    let horizontal = [(4, 14), (4, 15), (4, 16)];
    let vertical = [(3, 15), (4, 15), (5, 15)];
    for schedule in SCHEDULES {
        let mut engine = engine_with(9, 40, &horizontal, schedule);

        engine.step();
        assert_eq!(collect_live(&engine), vertical, "{schedule}");

        engine.step();
        assert_eq!(collect_live(&engine), horizontal, "{schedule}");

        engine.step_n(10);
        assert_eq!(collect_live(&engine), horizontal, "{schedule}");
        assert_eq!(engine.generation(), 12);
    }
}

#[test]
fn glider_moves_down_right_every_four_steps() {
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    for schedule in SCHEDULES {
        let offset: Vec<_> = glider.iter().map(|&(r, c)| (r + 4, c + 12)).collect();
        let mut engine = engine_with(24, 40, &offset, schedule);

        engine.step_n(4);
        let shifted: Vec<_> = offset.iter().map(|&(r, c)| (r + 1, c + 1)).collect();
        assert_alive(&engine, &shifted);
        assert_eq!(engine.population(), 5);

        // Crosses the group boundary at column 16 and keeps its shape.
        engine.step_n(16);
        let mut expected: Vec<_> = offset.iter().map(|&(r, c)| (r + 5, c + 5)).collect();
        expected.sort();
        assert_eq!(collect_live(&engine), expected, "{schedule}");
    }
}

#[test]
fn border_stays_dead() {
    let dims = Dimensions::new(21, 37).unwrap();
    for schedule in SCHEDULES {
        let mut engine = NybbleLife::with_config(
            Board::random(dims, 0xB0DE),
            NybbleLifeConfig::default().schedule(schedule),
        )
        .unwrap();
        for _ in 0..40 {
            engine.step();
            assert!(engine.board().border_is_clear());
            assert!(!engine.is_alive(21, 0));
            assert!(!engine.is_alive(0, 37));
        }
    }
}

#[test]
fn no_wraparound_between_left_and_right_edges() {
    for schedule in SCHEDULES {
        let mut left = engine_with(8, 8, &[(2, 0), (3, 0), (4, 0)], schedule);
        left.step();
        assert_eq!(collect_live(&left), [(3, 0), (3, 1)], "{schedule}");

        let mut right = engine_with(8, 8, &[(2, 7), (3, 7), (4, 7)], schedule);
        right.step();
        assert_eq!(collect_live(&right), [(3, 6), (3, 7)], "{schedule}");

        // Last column of a full group row: the padding group is the only
        // right neighbour.
        let mut wide = engine_with(8, 32, &[(2, 31), (3, 31), (4, 31)], schedule);
        wide.step();
        assert_eq!(collect_live(&wide), [(3, 30), (3, 31)], "{schedule}");
    }
}

#[test]
fn no_wraparound_between_top_and_bottom_edges() {
    for schedule in SCHEDULES {
        let mut top = engine_with(8, 8, &[(0, 2), (0, 3), (0, 4)], schedule);
        top.step();
        assert_eq!(collect_live(&top), [(0, 3), (1, 3)], "{schedule}");

        let mut bottom = engine_with(8, 8, &[(7, 2), (7, 3), (7, 4)], schedule);
        bottom.step();
        assert_eq!(collect_live(&bottom), [(6, 3), (7, 3)], "{schedule}");
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let dims = Dimensions::new(64, 80).unwrap();
    let run = |threads: usize, schedule: Schedule| {
        let mut engine = NybbleLife::with_config(
            Board::random(dims, 42),
            NybbleLifeConfig::default()
                .thread_count(threads)
                .schedule(schedule),
        )
        .unwrap();
        engine.step_n(30);
        engine.into_board()
    };

    let baseline = run(1, Schedule::Sequential);
    assert_eq!(run(1, Schedule::Sequential), baseline);
    for threads in [1, 2, 4, 7] {
        assert_eq!(run(threads, Schedule::RowParity), baseline, "threads={threads}");
    }
}

#[test]
fn empty_board_stays_empty() {
    for schedule in SCHEDULES {
        let mut engine = engine_with(10, 50, &[], schedule);
        engine.step_n(10);
        assert_eq!(engine.population(), 0);
        assert!(engine.board().is_empty());
    }
}

#[test]
fn mid_simulation_set_cell_is_respected() {
    let board = {
        let mut board = Board::new(Dimensions::new(10, 10).unwrap());
        for col in 3..6 {
            board.set_cell(5, col, true).unwrap();
        }
        board
    };
    let mut engine = NybbleLife::new(nybble_life::advance(board)).unwrap();
    assert_eq!(collect_live(&engine), [(4, 4), (5, 4), (6, 4)]);

    let mut board = engine.into_board();
    board.set_cell(0, 9, true).unwrap();
    engine = NybbleLife::new(board).unwrap();
    engine.step();
    assert_eq!(collect_live(&engine), [(5, 3), (5, 4), (5, 5)]);
}
