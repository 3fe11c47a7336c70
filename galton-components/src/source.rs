// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A data source.
//!
//! The data source produces data as defined by the [DataGenerator] that is
//! provided. Once the generator is exhausted the source closes its output, so
//! the source is the root of the termination of a model.
//!
//! # Ports
//!
//! This component has:
//!  - One [output port](galton_engine::port::OutPort): `tx`

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use galton_engine::engine::Engine;
use galton_engine::port::{OutPort, PortStateResult};
use galton_engine::traits::{Runnable, SimObject};
use galton_engine::types::{SimError, SimResult};
use galton_track::entity::Entity;
use galton_track::{debug, exit};

use crate::types::DataGenerator;
use crate::{connect_tx, take_option};

#[macro_export]
/// Build a generator that produces `$value` `$repeat` times.
macro_rules! option_box_repeat {
    ($value:expr ; $repeat:expr) => {
        Some(Box::new(std::iter::repeat($value).take($repeat)))
    };
}

pub struct Source<T>
where
    T: SimObject,
{
    entity: Rc<Entity>,
    data_generator: RefCell<Option<DataGenerator<T>>>,
    tx: RefCell<Option<OutPort<T>>>,
    num_sent: RefCell<usize>,
}

impl<T> fmt::Display for Source<T>
where
    T: SimObject,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}

impl<T> Source<T>
where
    T: SimObject,
{
    /// Create a source and register it with the `engine`.
    ///
    /// A source without a generator sends nothing and closes its output as
    /// soon as it runs.
    pub fn new_and_register(
        engine: &Engine,
        parent: &Rc<Entity>,
        name: &str,
        data_generator: Option<DataGenerator<T>>,
    ) -> Result<Rc<Self>, SimError> {
        let entity = Rc::new(Entity::new(parent, name));
        let tx = OutPort::new(&entity, "tx");
        let rc_self = Rc::new(Self {
            entity,
            data_generator: RefCell::new(data_generator),
            tx: RefCell::new(Some(tx)),
            num_sent: RefCell::new(0),
        });
        engine.register(rc_self.clone());
        Ok(rc_self)
    }

    #[must_use]
    pub fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    pub fn set_generator(&self, data_generator: Option<DataGenerator<T>>) {
        *self.data_generator.borrow_mut() = data_generator;
    }

    pub fn connect_port_tx(&self, port_state: PortStateResult<T>) -> SimResult {
        connect_tx!(self.tx, connect ; port_state)
    }

    #[must_use]
    pub fn num_sent(&self) -> usize {
        *self.num_sent.borrow()
    }
}

#[async_trait(?Send)]
impl<T> Runnable for Source<T>
where
    T: SimObject,
{
    async fn run(&self) -> SimResult {
        let tx = take_option!(self.tx);
        let data_generator = self.data_generator.borrow_mut().take();

        if let Some(data_generator) = data_generator {
            for value in data_generator {
                exit!(self.entity ; value.id());
                tx.put(value)?.await;
                *self.num_sent.borrow_mut() += 1;
            }
        }

        debug!(self.entity ; "sent {}, closing", self.num_sent());
        tx.close()
    }
}
