// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Perform routing between an input interface and a number of outputs.
//!
//! The [Router] is passed an algorithm that makes the decision about which
//! egress port to send each routed object to.
//!
//! # Ports
//!
//! This component has the following ports:
//!  - One [input port](galton_engine::port::InPort): `rx`
//!  - N [output ports](galton_engine::port::OutPort): `tx_i` for `i in [0, N-1]`
//!
//! # Function
//!
//! The [Router] takes objects from its input and sends each one to the output
//! chosen by the algorithm. Once its input has closed it closes every one of
//! its outputs. A simplified summary of its functionality is:
//!
//! ```rust
//! # use galton_components::router::Route;
//! # use galton_engine::port::{InPort, OutPort};
//! # use galton_engine::traits::SimObject;
//! # use galton_engine::types::SimResult;
//! #
//! # async fn run<T>(
//! #     tx: Vec<OutPort<T>>,
//! #     rx: InPort<T>,
//! #     routing_algorithm: Box<dyn Route<T>>
//! # ) -> SimResult
//! # where
//! #     T: SimObject
//! # {
//! while let Some(value) = rx.get()?.await {
//!     let tx_index = routing_algorithm.route(&value)?;
//!
//!     match tx.get(tx_index) {
//!         None => {
//!             // Report error
//!         }
//!         Some(tx) => {
//!             tx.put(value)?.await;
//!         }
//!     }
//! }
//! for tx in tx {
//!     tx.close()?;
//! }
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use galton_engine::engine::Engine;
use galton_engine::port::{InPort, OutPort, PortStateResult};
use galton_engine::sim_error;
use galton_engine::traits::{Runnable, SimObject};
use galton_engine::types::{SimError, SimResult};
use galton_track::entity::Entity;
use galton_track::{debug, enter, exit, trace};
use rand::Rng;
use rand::rngs::StdRng;

use crate::{port_rx, take_option};

/// Trait required for routing algorithms to implement.
pub trait Route<T> {
    /// Given an object, return the index of the egress port to map the object
    /// to.
    fn route(&self, object: &T) -> Result<usize, SimError>;
}

/// Send every object to one of two egress ports with equal probability.
///
/// Each decision is independent of the object being routed and of every
/// previous decision.
pub struct CoinFlip {
    rng: RefCell<StdRng>,
}

impl CoinFlip {
    #[must_use]
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: RefCell::new(rng),
        }
    }
}

impl<T> Route<T> for CoinFlip {
    fn route(&self, _object: &T) -> Result<usize, SimError> {
        if self.rng.borrow_mut().gen_bool(0.5) {
            Ok(0)
        } else {
            Ok(1)
        }
    }
}

pub struct Router<T>
where
    T: SimObject,
{
    pub entity: Rc<Entity>,
    rx: RefCell<Option<InPort<T>>>,
    tx: RefCell<Vec<OutPort<T>>>,
    algorithm: Box<dyn Route<T>>,
}

impl<T> fmt::Display for Router<T>
where
    T: SimObject,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}

impl<T> Router<T>
where
    T: SimObject,
{
    /// Create a router with its own single-producer input port.
    pub fn new_and_register(
        engine: &Engine,
        parent: &Rc<Entity>,
        name: &str,
        num_egress: usize,
        algorithm: Box<dyn Route<T>>,
    ) -> Result<Rc<Self>, SimError> {
        let entity = Rc::new(Entity::new(parent, name));
        let rx = InPort::new(&entity, "rx");
        Self::register(engine, entity, rx, num_egress, algorithm)
    }

    /// Create a router that consumes from an input port created elsewhere.
    ///
    /// This is how a router is attached to a channel that is shared between
    /// several producers and was created before the router itself.
    pub fn new_and_register_with_rx(
        engine: &Engine,
        parent: &Rc<Entity>,
        name: &str,
        rx: InPort<T>,
        num_egress: usize,
        algorithm: Box<dyn Route<T>>,
    ) -> Result<Rc<Self>, SimError> {
        let entity = Rc::new(Entity::new(parent, name));
        Self::register(engine, entity, rx, num_egress, algorithm)
    }

    fn register(
        engine: &Engine,
        entity: Rc<Entity>,
        rx: InPort<T>,
        num_egress: usize,
        algorithm: Box<dyn Route<T>>,
    ) -> Result<Rc<Self>, SimError> {
        if num_egress == 0 {
            return sim_error!(format!("{entity} must have at least one egress port"));
        }

        let mut tx = Vec::with_capacity(num_egress);
        for i in 0..num_egress {
            tx.push(OutPort::new(&entity, &format!("tx_{i}")));
        }
        let rc_self = Rc::new(Self {
            entity,
            rx: RefCell::new(Some(rx)),
            tx: RefCell::new(tx),
            algorithm,
        });
        engine.register(rc_self.clone());
        Ok(rc_self)
    }

    #[must_use]
    pub fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    pub fn connect_port_tx_i(&self, i: usize, port_state: PortStateResult<T>) -> SimResult {
        match self.tx.borrow_mut().get_mut(i) {
            None => {
                sim_error!(format!("{self}: no tx port {i}"))
            }
            Some(tx) => tx.connect(port_state),
        }
    }

    pub fn port_rx(&self) -> PortStateResult<T> {
        port_rx!(self.rx, state)
    }

    #[must_use]
    pub fn num_egress(&self) -> usize {
        self.tx.borrow().len()
    }
}

#[async_trait(?Send)]
impl<T> Runnable for Router<T>
where
    T: SimObject,
{
    async fn run(&self) -> SimResult {
        let tx: Vec<OutPort<T>> = self.tx.borrow_mut().drain(..).collect();
        let rx = take_option!(self.rx);
        let algorithm = &self.algorithm;

        while let Some(value) = rx.get()?.await {
            enter!(self.entity ; value.id());

            let tx_index = algorithm.route(&value)?;
            trace!(self.entity ; "Route {} to {}", value, tx_index);

            match tx.get(tx_index) {
                None => {
                    return sim_error!(format!(
                        "{self}: {value:?} selected invalid egress index {tx_index}"
                    ));
                }
                Some(tx) => {
                    exit!(self.entity ; value.id());
                    tx.put(value)?.await;
                }
            }
        }

        debug!(self.entity ; "input closed, closing {} outputs", tx.len());
        for tx in tx {
            tx.close()?;
        }
        Ok(())
    }
}
