// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A Galton board.
//!
//! Marbles are dropped from a single [source](galton_components::source) into
//! a triangle of [routers](galton_components::router). Each router passes
//! every marble it receives to one of the two channels below it with equal
//! probability, so the final position of a marble is the sum of independent
//! coin flips and the bins fill with a binomial distribution.
//!
//! ```text
//!              source
//!                |
//! row0          ch0
//!              /   \
//! row1      ch0     ch1
//!          /   \   /   \
//! row2  ch0     ch1     ch2
//!        |       |       |
//!      bin0    bin1    bin2
//! ```
//!
//! Interior channels are fed by two routers and only close once both of
//! them have seen their own input close. The end of the marble stream
//! therefore moves down the board one row at a time until every bin has
//! finished counting.
//!
//! # Example
//!
//! ```rust
//! use galton_board::board::build_board;
//! use galton_board::config::BoardConfig;
//! use galton_engine::engine::Engine;
//!
//! let mut engine = Engine::default();
//! let config = BoardConfig {
//!     marbles: 100,
//!     bins: 4,
//!     seed: Some(7),
//! };
//! let board = build_board(&engine, &config).unwrap();
//! let counts = board.run(&mut engine).unwrap();
//! assert_eq!(counts.iter().sum::<usize>(), 100);
//! ```

pub mod board;
pub mod config;
pub mod histogram;
pub mod marble;
