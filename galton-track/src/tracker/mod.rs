// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The [`Track`] interface and the trackers that implement it.

pub mod dev_null;
pub mod text;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::rc::Rc;

pub use dev_null::DevNullTracker;
use regex::Regex;
pub use text::TextTracker;

use crate::{Id, ROOT};

/// A trace event, reported by the entity named alongside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackEvent<'a> {
    /// An entity or object was created.
    Created {
        /// Id of the new entity or object.
        id: Id,
        /// Its full name or description.
        name: &'a str,
    },
    /// An entity was dropped.
    Destroyed(Id),
    /// An object arrived.
    Entered(Id),
    /// An object left.
    Exited(Id),
    /// A port was connected to the entity with this id.
    Connected(Id),
}

impl fmt::Display for TrackEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { id, name } => write!(f, "created {id}, {name}"),
            Self::Destroyed(id) => write!(f, "destroyed {id}"),
            Self::Entered(id) => write!(f, "enter {id}"),
            Self::Exited(id) => write!(f, "exit {id}"),
            Self::Connected(id) => write!(f, "connect to {id}"),
        }
    }
}

/// Receives every _log_ and _trace_ event of an entity hierarchy.
pub trait Track {
    /// Allocate a new id.
    fn unique_id(&self) -> Id;

    /// Called once for each entity, before any of its events.
    fn add_entity(&self, _id: Id, _full_name: &str) {}

    /// Whether the entity `id` reports events at `level`.
    fn is_entity_enabled(&self, id: Id, level: log::Level) -> bool;

    /// Record a trace event reported by `by`.
    fn event(&self, by: Id, event: TrackEvent);

    /// Record a log message from `by`.
    fn log(&self, by: Id, level: log::Level, msg: fmt::Arguments);

    /// Flush any buffered output.
    fn shutdown(&self) {}
}

/// A [`Track`] shared by every entity of a simulation.
pub type Tracker = Rc<dyn Track>;

/// A [`TextTracker`] writing to `stdout` with every entity at `level`.
#[must_use]
pub fn stdout_tracker(level: log::Level) -> Tracker {
    let stdout = Box::new(io::BufWriter::new(io::stdout()));
    Rc::new(TextTracker::new(EntityManager::new(level), stdout))
}

/// A tracker that drops every event.
#[must_use]
pub fn dev_null_tracker() -> Tracker {
    Rc::new(DevNullTracker)
}

/// Hands out ids and decides the level of each entity.
///
/// An entity gets the level of the first filter matching its full name, or the
/// default level when none match.
///
/// ```rust
/// use galton_track::tracker::EntityManager;
/// use regex::Regex;
///
/// let manager = EntityManager::new(log::Level::Error)
///     .with_filter(Regex::new("router").unwrap(), log::Level::Trace);
/// ```
pub struct EntityManager {
    default_level: log::Level,
    filters: Vec<(Regex, log::Level)>,
    next_id: Cell<u64>,

    /// Only entities whose level differs from the default.
    levels: RefCell<HashMap<Id, log::Level>>,
}

impl EntityManager {
    /// A manager with no filters.
    #[must_use]
    pub fn new(default_level: log::Level) -> Self {
        Self {
            default_level,
            filters: Vec::new(),
            next_id: Cell::new(ROOT.0),
            levels: RefCell::new(HashMap::new()),
        }
    }

    /// Give entities whose full name matches `filter` the level `level`.
    #[must_use]
    pub fn with_filter(mut self, filter: Regex, level: log::Level) -> Self {
        self.filters.push((filter, level));
        self
    }

    fn next_id(&self) -> Id {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Id(id)
    }

    fn level_of(&self, full_name: &str) -> log::Level {
        self.filters
            .iter()
            .find(|(filter, _)| filter.is_match(full_name))
            .map_or(self.default_level, |(_, level)| *level)
    }

    fn register(&self, id: Id, full_name: &str) {
        let level = self.level_of(full_name);
        if level != self.default_level {
            self.levels.borrow_mut().insert(id, level);
        }
    }

    fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        let entity_level = self.levels.borrow().get(&id).copied();
        level <= entity_level.unwrap_or(self.default_level)
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    const NAMES: [&str; 4] = ["top", "top::row1", "top::row1::router0", "top::bins::bin0"];

    fn levels(manager: &EntityManager) -> Vec<Level> {
        NAMES.iter().map(|name| manager.level_of(name)).collect()
    }

    fn filter(re: &str) -> Regex {
        Regex::new(re).unwrap()
    }

    #[test]
    fn default_level_without_filters() {
        let manager = EntityManager::new(Level::Error);
        assert_eq!(levels(&manager), [Level::Error; 4]);
    }

    #[test]
    fn rows_traced() {
        let manager = EntityManager::new(Level::Error).with_filter(filter("row"), Level::Trace);
        assert_eq!(
            levels(&manager),
            [Level::Error, Level::Trace, Level::Trace, Level::Error]
        );
    }

    #[test]
    fn earlier_filters_take_priority() {
        let manager = EntityManager::new(Level::Error)
            .with_filter(filter("router0$"), Level::Warn)
            .with_filter(filter("row"), Level::Info);
        assert_eq!(
            levels(&manager),
            [Level::Error, Level::Info, Level::Warn, Level::Error]
        );
    }

    #[test]
    fn registered_entities_use_their_level() {
        let manager = EntityManager::new(Level::Warn).with_filter(filter("bin0"), Level::Debug);

        let top = manager.next_id();
        manager.register(top, "top");
        let bin = manager.next_id();
        manager.register(bin, "top::bins::bin0");

        assert!(manager.is_enabled(top, Level::Warn));
        assert!(!manager.is_enabled(top, Level::Info));
        assert!(manager.is_enabled(bin, Level::Debug));
        assert!(!manager.is_enabled(bin, Level::Trace));
    }

    #[test]
    fn ids_count_up_from_root() {
        let manager = EntityManager::new(Level::Error);
        let ids: Vec<Id> = (0..3).map(|_| manager.next_id()).collect();
        assert_eq!(ids, [ROOT, Id(ROOT.0 + 1), Id(ROOT.0 + 2)]);
    }

    #[test]
    fn events_display() {
        let created = TrackEvent::Created {
            id: Id(4),
            name: "top::row0",
        };
        assert_eq!(created.to_string(), "created 4, top::row0");
        assert_eq!(TrackEvent::Connected(Id(9)).to_string(), "connect to 9");
    }
}
