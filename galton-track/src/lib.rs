// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Logging and tracing for the Galton board.
//!
//! Every part of a simulation owns an [`Entity`](crate::entity::Entity),
//! named by its place in the hierarchy (`top::row2::router1`). Entities
//! report two kinds of output through their shared [`Tracker`]:
//!
//!   - _log_ messages, at a [`log::Level`], from the [`trace!`] to
//!     [`error!`] macros;
//!   - _trace_ events, the [`TrackEvent`]s emitted by [`create!`],
//!     [`destroy!`], [`enter!`], [`exit!`] and [`connect!`]. These are
//!     recorded at `Trace` level.
//!
//! The tracker decides per entity which levels are enabled, see
//! [`EntityManager`](crate::tracker::EntityManager).

// Enable warnings for missing documentation
#![warn(missing_docs)]

pub use log;

pub mod builder;
pub mod entity;
pub mod id;
pub mod test_helpers;
pub mod tracker;

pub use id::{Id, Unique};
pub use tracker::{Track, TrackEvent, Tracker};

/// Destination of a text tracker.
pub type Writer = Box<dyn std::io::Write>;

/// Reported as the creator of the top-level entity.
pub const NO_ID: Id = Id(0);

/// The id of the first entity. Ids handed out by a tracker count up from here.
pub const ROOT: Id = Id(1);

/// Send a [`TrackEvent`] to the tracker of `$entity` when the entity is
/// traced. The event is only built when it will be recorded.
#[macro_export]
macro_rules! track {
    ($entity:expr ; $by:expr, $event:expr) => {
        if $entity
            .tracker
            .is_entity_enabled($entity.id, $crate::log::Level::Trace)
        {
            $entity.tracker.event($by, $event);
        }
    };
}

/// Trace an object arriving at an entity.
#[macro_export]
macro_rules! enter {
    ($entity:expr ; $id:expr) => {
        $crate::track!($entity ; $entity.id, $crate::TrackEvent::Entered($id))
    };
}

/// Trace an object leaving an entity.
#[macro_export]
macro_rules! exit {
    ($entity:expr ; $id:expr) => {
        $crate::track!($entity ; $entity.id, $crate::TrackEvent::Exited($id))
    };
}

/// Allocate an [`Id`] for an object whose creation is traced with [`create`].
#[macro_export]
macro_rules! create_id {
    ($entity:expr) => {{ $entity.tracker.unique_id() }};
}

/// Trace the creation of an entity, reported by its parent, or of an object
/// created by an entity.
#[macro_export]
macro_rules! create {
    ($entity:expr) => {
        $crate::track!($entity ; $entity.parent_id(), $crate::TrackEvent::Created {
            id: $entity.id,
            name: $entity.full_name(),
        })
    };
    ($entity:expr ; $created:expr) => {
        $crate::track!($entity ; $entity.id, $crate::TrackEvent::Created {
            id: $crate::Unique::id(&$created),
            name: &format!("{}", $created),
        })
    };
}

/// Trace the end of an entity, reported by its parent.
#[macro_export]
macro_rules! destroy {
    ($entity:expr) => {
        $crate::track!($entity ; $entity.parent_id(), $crate::TrackEvent::Destroyed($entity.id))
    };
}

/// Trace a connection from one entity to another.
#[macro_export]
macro_rules! connect {
    ($from:expr ; $to:expr) => {
        $crate::track!($from ; $from.id, $crate::TrackEvent::Connected($to.id))
    };
}

/// Base macro for log messages of all level.
///
/// Formats the message lazily: the arguments are only evaluated if the entity
/// is enabled at the requested level.
#[macro_export]
macro_rules! log_base {
    ($entity:expr ; $lvl:expr, $($arg:tt)+) => (
        if $entity.tracker.is_entity_enabled($entity.id, $lvl) {
            $entity.tracker.log($entity.id, $lvl, format_args!($($arg)+));
        }
    );
}

/// Log at level `log::Level::Trace`
#[macro_export]
macro_rules! trace {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Trace, $($arg)+);
    );
}

/// Log at level `log::Level::Debug`
#[macro_export]
macro_rules! debug {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Debug, $($arg)+);
    );
}

/// Log at level `log::Level::Info`
#[macro_export]
macro_rules! info {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Info, $($arg)+);
    );
}

/// Log at level `log::Level::Warn`
#[macro_export]
macro_rules! warn {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Warn, $($arg)+);
    );
}

/// Log at level `log::Level::Error`
#[macro_export]
macro_rules! error {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_base!($entity ; $crate::log::Level::Error, $($arg)+);
    );
}
