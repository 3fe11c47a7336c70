// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A tracker that discards everything, for benchmarks.

use std::fmt;

use crate::Id;
use crate::tracker::{Track, TrackEvent};

/// Every entity is disabled and every id is [`NO_ID`](crate::NO_ID).
pub struct DevNullTracker;

impl Track for DevNullTracker {
    fn unique_id(&self) -> Id {
        crate::NO_ID
    }

    fn is_entity_enabled(&self, _id: Id, _level: log::Level) -> bool {
        false
    }

    fn event(&self, _by: Id, _event: TrackEvent) {}

    fn log(&self, _by: Id, _level: log::Level, _msg: fmt::Arguments) {}
}
