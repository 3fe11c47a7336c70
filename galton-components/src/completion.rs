// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Completion tracking.
//!
//! A [Completion] is armed with the number of participants that have to
//! finish. Each participant calls [`signal`](Completion::signal) exactly once;
//! the signal that brings the count to zero triggers the completion event.
//!
//! The event can be handed to
//! [`Engine::run_until`](galton_engine::engine::Engine::run_until) or awaited
//! from within the simulation with [`wait`](Completion::wait).

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::{AcqRel, Acquire};

use galton_engine::events::once::Once;
use galton_engine::sim_error;
use galton_engine::traits::{Event, Eventable};
use galton_engine::types::{SimError, SimResult};
use galton_track::debug;
use galton_track::entity::Entity;

#[derive(Clone)]
pub struct Completion {
    entity: Rc<Entity>,
    remaining: Rc<AtomicUsize>,
    done: Once,
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}

impl Completion {
    /// Create a tracker waiting for `count` signals.
    ///
    /// A tracker with nothing to wait for is complete immediately.
    pub fn new(parent: &Rc<Entity>, name: &str, count: usize) -> Result<Self, SimError> {
        let completion = Self {
            entity: Rc::new(Entity::new(parent, name)),
            remaining: Rc::new(AtomicUsize::new(count)),
            done: Once::new(),
        };
        if count == 0 {
            completion.done.notify()?;
        }
        Ok(completion)
    }

    #[must_use]
    pub fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    /// Record that one participant has finished.
    pub fn signal(&self) -> SimResult {
        let previous = self
            .remaining
            .fetch_update(AcqRel, Acquire, |remaining| remaining.checked_sub(1));

        match previous {
            Err(_) => sim_error!(format!("{self} signalled too many times")),
            Ok(1) => {
                debug!(self.entity ; "complete");
                self.done.notify()
            }
            Ok(_) => Ok(()),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.load(Acquire)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.done.is_triggered()
    }

    /// The event that fires once every participant has signalled.
    #[must_use]
    pub fn event(&self) -> Eventable {
        Box::new(self.done.clone())
    }

    /// Suspend the calling task until every participant has signalled.
    pub async fn wait(&self) {
        self.done.listen().await;
    }
}
