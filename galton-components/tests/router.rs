// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use galton_components::connect_port;
use galton_components::router::{CoinFlip, Route, Router};
use galton_components::sink::Sink;
use galton_components::source::Source;
use galton_engine::engine::Engine;
use galton_engine::run_simulation;
use galton_engine::test_helpers::start_test;
use galton_engine::types::SimError;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Route every value to the egress given by its value modulo the port count.
struct Modulo {
    num_egress: usize,
}

impl Route<i32> for Modulo {
    fn route(&self, object: &i32) -> Result<usize, SimError> {
        Ok(*object as usize % self.num_egress)
    }
}

/// Always route to the same egress port.
struct Fixed(usize);

impl Route<i32> for Fixed {
    fn route(&self, _object: &i32) -> Result<usize, SimError> {
        Ok(self.0)
    }
}

fn coin_flip_counts(seed: u64, num_values: i32) -> (usize, usize) {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let source = Source::new_and_register(&engine, &top, "source", Some(Box::new(0..num_values)))
        .unwrap();
    let router = Router::new_and_register(
        &engine,
        &top,
        "router",
        2,
        Box::new(CoinFlip::new(StdRng::seed_from_u64(seed))),
    )
    .unwrap();
    let left = Sink::new_and_register(&engine, &top, "left", None).unwrap();
    let right = Sink::new_and_register(&engine, &top, "right", None).unwrap();

    connect_port!(source, tx => router, rx).unwrap();
    connect_port!(router, tx, 0 => left, rx).unwrap();
    connect_port!(router, tx, 1 => right, rx).unwrap();

    run_simulation!(engine);
    assert!(left.is_finished());
    assert!(right.is_finished());
    (left.num_sunk(), right.num_sunk())
}

#[test]
fn coin_flip_conserves_values() {
    let (left, right) = coin_flip_counts(1, 1000);
    assert_eq!(left + right, 1000);

    // Both sides must have been chosen a reasonable number of times
    assert!(left > 400, "left {left}");
    assert!(right > 400, "right {right}");
}

#[test]
fn coin_flip_is_reproducible() {
    assert_eq!(coin_flip_counts(42, 500), coin_flip_counts(42, 500));
}

#[test]
fn route_by_value() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let source = Source::new_and_register(&engine, &top, "source", Some(Box::new(0..10))).unwrap();
    let router = Router::new_and_register(
        &engine,
        &top,
        "router",
        3,
        Box::new(Modulo { num_egress: 3 }),
    )
    .unwrap();
    assert_eq!(router.num_egress(), 3);

    let sinks: Vec<_> = (0..3)
        .map(|i| Sink::new_and_register(&engine, &top, &format!("sink{i}"), None).unwrap())
        .collect();

    connect_port!(source, tx => router, rx).unwrap();
    for (i, sink) in sinks.iter().enumerate() {
        connect_port!(router, tx, i => sink, rx).unwrap();
    }

    run_simulation!(engine);
    let counts: Vec<usize> = sinks.iter().map(|s| s.num_sunk()).collect();
    assert_eq!(counts, vec![4, 3, 3]);
}

#[test]
fn empty_input_closes_all_outputs() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let source: std::rc::Rc<Source<i32>> =
        Source::new_and_register(&engine, &top, "source", None).unwrap();
    let router = Router::new_and_register(&engine, &top, "router", 2, Box::new(Fixed(0))).unwrap();
    let left = Sink::new_and_register(&engine, &top, "left", None).unwrap();
    let right = Sink::new_and_register(&engine, &top, "right", None).unwrap();

    connect_port!(source, tx => router, rx).unwrap();
    connect_port!(router, tx, 0 => left, rx).unwrap();
    connect_port!(router, tx, 1 => right, rx).unwrap();

    run_simulation!(engine);
    assert_eq!(source.num_sent(), 0);
    assert!(left.is_finished());
    assert!(right.is_finished());
    assert_eq!(left.num_sunk() + right.num_sunk(), 0);
}

#[test]
fn invalid_egress_index() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let source = Source::new_and_register(&engine, &top, "source", Some(Box::new(0..1))).unwrap();
    let router = Router::new_and_register(&engine, &top, "router", 2, Box::new(Fixed(5))).unwrap();
    let left = Sink::new_and_register(&engine, &top, "left", None).unwrap();
    let right = Sink::new_and_register(&engine, &top, "right", None).unwrap();

    connect_port!(source, tx => router, rx).unwrap();
    connect_port!(router, tx, 0 => left, rx).unwrap();
    connect_port!(router, tx, 1 => right, rx).unwrap();

    run_simulation!(engine, "Error: top::router: 0 selected invalid egress index 5");
}

#[test]
fn unconnected_egress() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let source = Source::new_and_register(&engine, &top, "source", Some(Box::new(0..1))).unwrap();
    let router = Router::new_and_register(&engine, &top, "router", 2, Box::new(Fixed(0))).unwrap();
    connect_port!(source, tx => router, rx).unwrap();

    run_simulation!(engine, "Error: top::router::tx_0 not connected");
}

#[test]
fn no_such_egress_port() {
    let engine = Engine::default();
    let top = engine.top().clone();

    let router: std::rc::Rc<Router<i32>> =
        Router::new_and_register(&engine, &top, "router", 2, Box::new(Fixed(0))).unwrap();
    let sink = Sink::new_and_register(&engine, &top, "sink", None).unwrap();

    match connect_port!(router, tx, 2 => sink, rx) {
        Ok(()) => panic!("Expected an error!"),
        Err(e) => assert_eq!(format!("{e}"), "Error: top::router: no tx port 2"),
    }
}

#[test]
fn no_egress_ports() {
    let engine = Engine::default();
    let top = engine.top().clone();

    match Router::<i32>::new_and_register(&engine, &top, "router", 0, Box::new(Fixed(0))) {
        Ok(_) => panic!("Expected an error!"),
        Err(e) => assert_eq!(
            format!("{e}"),
            "Error: top::router must have at least one egress port"
        ),
    }
}
