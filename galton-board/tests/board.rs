// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use galton_board::board::build_board;
use galton_board::config::BoardConfig;
use galton_engine::test_helpers::start_test;

fn run_board(marbles: usize, bins: usize, seed: Option<u64>) -> Vec<usize> {
    let mut engine = start_test(file!());
    let config = BoardConfig {
        marbles,
        bins,
        seed,
    };
    let board = build_board(&engine, &config).unwrap();
    let counts = board.run(&mut engine).unwrap();
    assert!(board.is_complete());
    assert_eq!(board.num_dropped(), marbles);
    counts
}

#[test]
fn default_board() {
    let config = BoardConfig {
        seed: Some(1),
        ..Default::default()
    };
    let counts = run_board(config.marbles, config.bins, config.seed);
    assert_eq!(counts.len(), 5);
    assert_eq!(counts.iter().sum::<usize>(), 1000);
}

#[test]
fn every_marble_lands_in_a_bin() {
    let counts = run_board(100, 5, Some(3));
    assert_eq!(counts.len(), 5);
    assert_eq!(counts.iter().sum::<usize>(), 100);
}

#[test]
fn no_marbles() {
    let counts = run_board(0, 5, Some(3));
    assert_eq!(counts, vec![0; 5]);
}

#[test]
fn smallest_board() {
    let counts = run_board(1000, 2, Some(11));
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0] + counts[1], 1000);
    assert!(counts[0] > 400 && counts[1] > 400, "{counts:?}");
}

#[test]
fn single_marble() {
    let counts = run_board(1, 6, Some(5));
    assert_eq!(counts.iter().sum::<usize>(), 1);
}

#[test]
fn binomial_shape() {
    // Expect 2500 / 5000 / 2500
    let counts = run_board(10000, 3, Some(17));
    assert_eq!(counts.iter().sum::<usize>(), 10000);
    assert!(counts[1] > 4500 && counts[1] < 5500, "{counts:?}");
    assert!(counts[0] > 2000 && counts[0] < 3000, "{counts:?}");
    assert!(counts[2] > 2000 && counts[2] < 3000, "{counts:?}");
}

#[test]
fn middle_bins_fill_most() {
    let counts = run_board(4000, 7, Some(23));
    assert_eq!(counts.iter().sum::<usize>(), 4000);
    assert!(counts[3] > counts[0]);
    assert!(counts[3] > counts[6]);
}

#[test]
fn seeded_runs_repeat() {
    assert_eq!(run_board(500, 6, Some(99)), run_board(500, 6, Some(99)));
}

#[test]
fn large_board() {
    let counts = run_board(200, 40, Some(7));
    assert_eq!(counts.len(), 40);
    assert_eq!(counts.iter().sum::<usize>(), 200);
}

#[test]
fn unseeded_boards_conserve_marbles() {
    for (marbles, bins) in [(0, 2), (1, 3), (250, 5), (1000, 12)] {
        let counts = run_board(marbles, bins, None);
        assert_eq!(counts.len(), bins);
        assert_eq!(counts.iter().sum::<usize>(), marbles, "{counts:?}");
    }
}

#[test]
fn unseeded_runs_vary() {
    // Equal results from two entropy-seeded 2000 marble runs are vanishingly
    // unlikely
    assert_ne!(run_board(2000, 9, None), run_board(2000, 9, None));
}
