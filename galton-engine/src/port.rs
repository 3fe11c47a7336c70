// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Port
//!
//! An [`InPort`] owns the state of an unbuffered channel. Each producer
//! connects an [`OutPort`] to it, up to the number of producers the channel
//! was created with.
//!
//! A [`put`](OutPort::put) completes only once the consumer has taken that
//! value. When several producers are blocked on the same channel their values
//! are delivered one at a time.
//!
//! The channel keeps a count of the producers that have not yet closed. Each
//! producer [`close`](OutPort::close)s its end once it will never send again.
//! The close that brings the count to zero closes the channel, after which
//! [`get`](InPort::get) resolves to `None`.

use std::cell::RefCell;
use std::fmt;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::{AcqRel, Acquire};
use std::task::{Context, Poll, Waker};

use futures::Future;
use futures::future::FusedFuture;
use galton_track::entity::Entity;
use galton_track::{connect, debug};

use crate::sim_error;
use crate::traits::SimObject;
use crate::types::{SimError, SimResult};

pub type PortStateResult<T> = Result<Rc<PortState<T>>, SimError>;
pub type PortGetResult<T> = Result<PortGet<T>, SimError>;
pub type PortPutResult<T> = Result<PortPut<T>, SimError>;

pub struct PortState<T>
where
    T: SimObject,
{
    value: RefCell<Option<T>>,
    waiting_get: RefCell<Option<Waker>>,
    waiting_put: RefCell<Vec<Waker>>,

    /// Number of values placed in the channel so far.
    num_put: RefCell<u64>,

    /// Number of values taken by the consumer so far.
    num_taken: RefCell<u64>,

    num_producers: usize,
    num_connected: RefCell<usize>,
    remaining_producers: AtomicUsize,
    closed: RefCell<bool>,

    pub in_port_entity: Rc<Entity>,
}

impl<T> PortState<T>
where
    T: SimObject,
{
    fn new(in_port_entity: Rc<Entity>, num_producers: usize) -> Self {
        Self {
            value: RefCell::new(None),
            waiting_get: RefCell::new(None),
            waiting_put: RefCell::new(Vec::new()),
            num_put: RefCell::new(0),
            num_taken: RefCell::new(0),
            num_producers,
            num_connected: RefCell::new(0),
            remaining_producers: AtomicUsize::new(num_producers),
            closed: RefCell::new(false),
            in_port_entity,
        }
    }

    /// Record that one producer will never send again.
    ///
    /// The decrement and the close are a single step so exactly one producer
    /// performs the close.
    fn producer_done(&self) -> SimResult {
        let previous = self
            .remaining_producers
            .fetch_update(AcqRel, Acquire, |remaining| remaining.checked_sub(1));

        // Neither error is reachable while connections are limited to
        // `num_producers` and `OutPort::close` consumes the port.
        match previous {
            Err(_) => sim_error!(format!(
                "{} closed more times than it has producers",
                self.in_port_entity
            )),
            Ok(1) => {
                let mut closed = self.closed.borrow_mut();
                if *closed {
                    return sim_error!(format!("{} closed twice", self.in_port_entity));
                }
                *closed = true;
                debug!(self.in_port_entity ; "closed");

                if let Some(waker) = self.waiting_get.borrow_mut().take() {
                    waker.wake();
                }
                Ok(())
            }
            Ok(_) => Ok(()),
        }
    }

    fn wake_putters(&self) {
        for waker in self.waiting_put.borrow_mut().drain(..) {
            waker.wake();
        }
    }
}

pub struct InPort<T>
where
    T: SimObject,
{
    pub entity: Rc<Entity>,
    state: Rc<PortState<T>>,
}

impl<T> fmt::Display for InPort<T>
where
    T: SimObject,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}

impl<T> InPort<T>
where
    T: SimObject,
{
    /// Create a port fed by a single producer.
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str) -> Self {
        Self::with_entity(Rc::new(Entity::new(parent, name)), 1)
    }

    /// Create a port that is fed by `num_producers` producers and will close
    /// once all of them have closed.
    pub fn new_with_producers(
        parent: &Rc<Entity>,
        name: &str,
        num_producers: usize,
    ) -> Result<Self, SimError> {
        let entity = Rc::new(Entity::new(parent, name));
        if num_producers == 0 {
            return sim_error!(format!("{entity} must have at least one producer"));
        }
        Ok(Self::with_entity(entity, num_producers))
    }

    fn with_entity(entity: Rc<Entity>, num_producers: usize) -> Self {
        Self {
            entity: entity.clone(),
            state: Rc::new(PortState::new(entity, num_producers)),
        }
    }

    /// Hand out the channel state to a producer.
    pub fn state(&self) -> PortStateResult<T> {
        let mut num_connected = self.state.num_connected.borrow_mut();
        if *num_connected == self.state.num_producers {
            return sim_error!(format!("{self} already connected"));
        }

        *num_connected += 1;
        Ok(self.state.clone())
    }

    #[must_use = "Futures do nothing unless you `.await` or otherwise use them"]
    pub fn get(&self) -> PortGetResult<T> {
        if *self.state.num_connected.borrow() == 0 {
            return sim_error!(format!("{self} not connected"));
        }

        Ok(PortGet {
            state: self.state.clone(),
            done: false,
        })
    }

    #[must_use]
    pub fn num_producers(&self) -> usize {
        self.state.num_producers
    }

    #[must_use]
    pub fn num_connected(&self) -> usize {
        *self.state.num_connected.borrow()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.state.closed.borrow()
    }
}

pub struct OutPort<T>
where
    T: SimObject,
{
    pub entity: Rc<Entity>,
    state: Option<Rc<PortState<T>>>,
}

impl<T> fmt::Display for OutPort<T>
where
    T: SimObject,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.entity.fmt(f)
    }
}

impl<T> OutPort<T>
where
    T: SimObject,
{
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str) -> Self {
        let entity = Rc::new(Entity::new(parent, name));
        Self {
            entity,
            state: None,
        }
    }

    pub fn connect(&mut self, port_state: PortStateResult<T>) -> SimResult {
        let port_state = port_state?;

        connect!(self.entity ; port_state.in_port_entity);
        match self.state {
            Some(_) => {
                return sim_error!(format!("{self} already connected"));
            }
            None => {
                self.state = Some(port_state);
            }
        }
        Ok(())
    }

    #[must_use = "Futures do nothing unless you `.await` or otherwise use them"]
    pub fn put(&self, value: T) -> PortPutResult<T> {
        let state = match self.state.as_ref() {
            Some(s) => s.clone(),
            None => return sim_error!(format!("{self} not connected")),
        };
        Ok(PortPut {
            state,
            value: RefCell::new(Some(value)),
            ticket: RefCell::new(None),
            done: RefCell::new(false),
        })
    }

    /// Signal that this producer will never send again.
    pub fn close(self) -> SimResult {
        match self.state.as_ref() {
            Some(state) => state.producer_done(),
            None => sim_error!(format!("{self} not connected")),
        }
    }
}

pub struct PortPut<T>
where
    T: SimObject,
{
    state: Rc<PortState<T>>,
    value: RefCell<Option<T>>,

    /// Position of the value in the channel once it has been placed.
    ticket: RefCell<Option<u64>>,
    done: RefCell<bool>,
}

impl<T> Future for PortPut<T>
where
    T: SimObject,
{
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ticket = *self.ticket.borrow();
        match ticket {
            Some(ticket) => {
                if *self.state.num_taken.borrow() > ticket {
                    // The value has been consumed
                    *self.done.borrow_mut() = true;
                    return Poll::Ready(());
                }
            }
            None => {
                if self.state.value.borrow().is_none() {
                    if let Some(value) = self.value.borrow_mut().take() {
                        *self.state.value.borrow_mut() = Some(value);

                        let mut num_put = self.state.num_put.borrow_mut();
                        *self.ticket.borrow_mut() = Some(*num_put);
                        *num_put += 1;

                        if let Some(waker) = self.state.waiting_get.borrow_mut().take() {
                            waker.wake();
                        }
                    }
                }
                // Otherwise another producer's value is waiting to be consumed
            }
        }

        self.state
            .waiting_put
            .borrow_mut()
            .push(cx.waker().clone());
        Poll::Pending
    }
}

impl<T> FusedFuture for PortPut<T>
where
    T: SimObject,
{
    fn is_terminated(&self) -> bool {
        *self.done.borrow()
    }
}

pub struct PortGet<T>
where
    T: SimObject,
{
    state: Rc<PortState<T>>,
    done: bool,
}

impl<T> Future for PortGet<T>
where
    T: SimObject,
{
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let value = self.state.value.borrow_mut().take();
        if let Some(value) = value {
            self.done = true;
            *self.state.num_taken.borrow_mut() += 1;
            self.state.wake_putters();
            Poll::Ready(Some(value))
        } else if *self.state.closed.borrow() {
            self.done = true;
            Poll::Ready(None)
        } else {
            *self.state.waiting_get.borrow_mut() = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

impl<T> FusedFuture for PortGet<T>
where
    T: SimObject,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}
