// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! The Galton board simulation engine.
//!
//! This library provides the core of the [Engine](crate::engine) which
//! executes event driven asynchronous simulation
//! [components](../galton_components/index.html).
//!
//! Components run as cooperative tasks on a single-threaded
//! [executor](crate::executor) and communicate only through
//! [ports](crate::port). A port is an unbuffered channel: a `put` completes
//! only once the consumer has taken the value. A port may be fed by several
//! producers and closes once every one of them has closed its end, which is
//! how the end of the data stream is propagated through a model.
//!
//! # Simple Application
//!
//! A very simple application would look like:
//!
//! ```rust
//! use galton_components::sink::Sink;
//! use galton_components::source::Source;
//! use galton_components::{connect_port, option_box_repeat};
//! use galton_engine::engine::Engine;
//! use galton_engine::run_simulation;
//!
//! let mut engine = Engine::default();
//! let top = engine.top().clone();
//! let source = Source::new_and_register(&engine, &top, "source", option_box_repeat!(0x123 ; 10))
//!     .expect("should be able to create and register `Source`");
//! let sink = Sink::new_and_register(&engine, &top, "sink", None)
//!     .expect("should be able to create and register `Sink`");
//! connect_port!(source, tx => sink, rx)
//!     .expect("should be able to connect `Source` to `Sink`");
//! run_simulation!(engine);
//! assert_eq!(sink.num_sunk(), 10);
//! ```

pub mod engine;
pub mod events;
pub mod executor;
pub mod port;
pub mod test_helpers;
pub mod traits;
pub mod types;

#[macro_export]
/// Run the simulation and check the outcome.
///
/// With only an engine the simulation must succeed. With an expected message
/// the simulation must fail with exactly that error.
macro_rules! run_simulation {
    ($engine:ident) => {
        $engine.run().unwrap();
    };
    ($engine:ident, $expect:expr) => {
        match $engine.run() {
            Ok(()) => panic!("Expected an error!"),
            Err(e) => assert_eq!(format!("{e}").as_str(), $expect),
        }
    };
}
