// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! This module provides helper functions for testing logging output
//!
//! The aim of this module is to provide commonly-used functions that enable the
//! testing of the output that should appear from logging macros.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

use regex::Regex;

use crate::tracker::{EntityManager, TextTracker, dev_null_tracker};
use crate::{Id, Track, TrackEvent, Tracker};

/// A tracker that keeps track events.
pub struct TestTracker {
    events: RefCell<Vec<String>>,

    unique_id: Cell<u64>,

    level: log::Level,
}

impl TestTracker {
    /// Create a new [`Tracker`] for the tests.
    ///
    /// This keeps the track events in memory for checking later.
    #[must_use]
    pub fn new(initial_id: u64, level: log::Level) -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            unique_id: Cell::new(initial_id),
            level,
        }
    }

    fn add_event(&self, event: String) {
        println!("{event}");
        self.events.borrow_mut().push(event);
    }

    /// Return a copy of the events seen so far.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl Track for TestTracker {
    fn unique_id(&self) -> Id {
        let id = self.unique_id.get();
        self.unique_id.set(id + 1);
        Id(id)
    }

    fn is_entity_enabled(&self, _id: Id, level: log::Level) -> bool {
        level <= self.level
    }

    fn event(&self, by: Id, event: TrackEvent) {
        self.add_event(format!("{by}: {event}"));
    }

    fn log(&self, by: Id, level: log::Level, msg: std::fmt::Arguments) {
        self.add_event(format!("{by}:{level}: {msg}"));
    }
}

/// Create a [`TestTracker`] and the [`Tracker`] handle that shares it.
///
/// # Examples
///
/// ```
/// use galton_track::test_helpers;
///
/// let (test_tracker, tracker) = galton_track::test_init!(10);
/// let top = galton_track::entity::toplevel(&tracker, "top");
/// galton_track::info!(top ; "hello");
/// test_helpers::check_and_clear(&test_tracker, &["10:INFO: hello"]);
/// ```
#[macro_export]
macro_rules! test_init {
    ($start_id:expr) => {
        $crate::test_init!($start_id, $crate::log::Level::Info)
    };
    ($start_id:expr, $level:expr) => {{
        let test_tracker =
            std::rc::Rc::new($crate::test_helpers::TestTracker::new($start_id, $level));
        let tracker: $crate::Tracker = test_tracker.clone();
        (test_tracker, tracker)
    }};
}

/// Check and clear the _trace_ and _log_ output
///
/// This function asserts that the logging output lines seen since the start or
/// the last time this function was called match the `expected` regular
/// expressions, in order. It then clears the recorded output.
pub fn check_and_clear(tracker: &TestTracker, expected: &[&str]) {
    let mut events = tracker.events.borrow_mut();

    println!("Checking {expected:?} matches {:?}", *events);
    assert_eq!(expected.len(), events.len());

    for (i, (log_expect, actual)) in expected.iter().zip(events.iter()).enumerate() {
        let re = Regex::new(log_expect).unwrap();
        println!("Checking {i}: {log_expect:?} matches {actual:?}");
        assert!(re.is_match(actual));
    }

    events.clear();
}

/// Create the tracker used by integration tests.
///
/// The log output of each test file is written next to the other build
/// artefacts in the system temporary directory so that it does not clutter the
/// console. If the file cannot be created all events are dropped.
#[must_use]
pub fn create_tracker(full_filepath: &str) -> Tracker {
    let stem = Path::new(full_filepath)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("test");
    let log_path = std::env::temp_dir().join(format!("galton_{stem}.log"));

    match fs::File::create(log_path) {
        Ok(file) => {
            let entity_manager = EntityManager::new(log::Level::Info);
            Rc::new(TextTracker::new(
                entity_manager,
                Box::new(BufWriter::new(file)),
            ))
        }
        Err(_) => dev_null_tracker(),
    }
}
