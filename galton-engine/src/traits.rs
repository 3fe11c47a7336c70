// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A set of common traits used across the engine.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use galton_track::Unique;

use crate::types::SimResult;

/// A super-trait that objects that are passed around the simulation have to
/// implement
///
///  - Clone:       Allows the application to keep copies of objects sent
///    around.
///  - Debug:       In order to print "{:?}" objects have to at least implement
///    Debug.
///  - Display:     Used when logging the object.
///  - Unique:      Provides the id used to follow the object in the trace.
///  - 'static:     Due to the way that futures are implemented, the lifetimes
///    need to be `static. This means that objects may have to be placed in
///    `Box` to make the static.
pub trait SimObject: Clone + Debug + Display + Unique + 'static {}

// Implementations for basic types that can be sent around the simulation for
// testing
impl SimObject for i32 {}
impl SimObject for usize {}

/// A component that can be registered with the
/// [`Engine`](crate::engine::Engine) and will be spawned when the simulation
/// starts.
#[async_trait(?Send)]
pub trait Runnable {
    /// The body of the component. Returning ends the component's task.
    async fn run(&self) -> SimResult {
        Ok(())
    }
}

/// Something a task can wait for, such as a [`Once`](crate::events::once::Once).
pub trait Event {
    /// A future that completes once the event has happened.
    #[must_use = "Futures do nothing unless you `.await` or otherwise use them"]
    fn listen(&self) -> BoxFuture<'static, ()>;
}

/// A boxed [`Event`], as taken by
/// [`Engine::run_until`](crate::engine::Engine::run_until).
pub type Eventable = Box<dyn Event>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
