// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Sink components.
//!
//! A [Sink] counts everything it receives until its input closes. It then
//! signals the optional [Completion] it was given.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use galton_engine::engine::Engine;
use galton_engine::port::{InPort, PortStateResult};
use galton_engine::traits::{Runnable, SimObject};
use galton_engine::types::{SimError, SimResult};
use galton_track::entity::Entity;
use galton_track::{debug, enter};

use crate::completion::Completion;
use crate::{port_rx, take_option};

pub struct Sink<T>
where
    T: SimObject,
{
    pub entity: Rc<Entity>,
    sunk_count: RefCell<usize>,
    finished: RefCell<bool>,
    rx: RefCell<Option<InPort<T>>>,
    completion: Option<Completion>,
}

impl<T> fmt::Display for Sink<T>
where
    T: SimObject,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}

impl<T> Sink<T>
where
    T: SimObject,
{
    pub fn new_and_register(
        engine: &Engine,
        parent: &Rc<Entity>,
        name: &str,
        completion: Option<Completion>,
    ) -> Result<Rc<Self>, SimError> {
        let entity = Rc::new(Entity::new(parent, name));
        let rx = InPort::new(&entity, "rx");
        Ok(Self::register(engine, entity, rx, completion))
    }

    /// Create a sink that drains an input port created elsewhere.
    pub fn new_and_register_with_rx(
        engine: &Engine,
        parent: &Rc<Entity>,
        name: &str,
        rx: InPort<T>,
        completion: Option<Completion>,
    ) -> Result<Rc<Self>, SimError> {
        let entity = Rc::new(Entity::new(parent, name));
        Ok(Self::register(engine, entity, rx, completion))
    }

    fn register(
        engine: &Engine,
        entity: Rc<Entity>,
        rx: InPort<T>,
        completion: Option<Completion>,
    ) -> Rc<Self> {
        let rc_self = Rc::new(Self {
            entity,
            sunk_count: RefCell::new(0),
            finished: RefCell::new(false),
            rx: RefCell::new(Some(rx)),
            completion,
        });
        engine.register(rc_self.clone());
        rc_self
    }

    #[must_use]
    pub fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    pub fn port_rx(&self) -> PortStateResult<T> {
        port_rx!(self.rx, state)
    }

    #[must_use]
    pub fn num_sunk(&self) -> usize {
        *self.sunk_count.borrow()
    }

    /// Whether the input of this sink has closed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        *self.finished.borrow()
    }
}

#[async_trait(?Send)]
impl<T> Runnable for Sink<T>
where
    T: SimObject,
{
    async fn run(&self) -> SimResult {
        let rx = take_option!(self.rx);
        while let Some(value) = rx.get()?.await {
            enter!(self.entity ; value.id());
            *self.sunk_count.borrow_mut() += 1;
        }

        *self.finished.borrow_mut() = true;
        debug!(self.entity ; "finished with {}", self.num_sunk());
        match &self.completion {
            Some(completion) => completion.signal(),
            None => Ok(()),
        }
    }
}
