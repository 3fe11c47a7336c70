// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Release;

use galton_track::entity::{Entity, toplevel};
use galton_track::tracker::stdout_tracker;
use galton_track::{Tracker, debug};

use crate::executor::Executor;
use crate::traits::{Eventable, Runnable};
use crate::types::SimResult;

/// A component registered with the [`Engine`], spawned when it starts running.
pub type Component = Rc<dyn Runnable>;

pub struct Engine {
    executor: Executor,
    toplevel: Rc<Entity>,
    tracker: Tracker,
    registered: RefCell<Vec<Component>>,
}

impl Engine {
    /// Create a standalone engine.
    pub fn new(tracker: &Tracker) -> Self {
        let toplevel = toplevel(tracker, "top");
        Self {
            executor: Executor::new(&toplevel),
            toplevel,
            tracker: tracker.clone(),
            registered: RefCell::new(Vec::new()),
        }
    }

    /// Register a component whose `run()` will be spawned when the
    /// simulation starts.
    pub fn register(&self, component: Component) {
        self.registered.borrow_mut().push(component);
    }

    /// Run until no task can make any more progress.
    pub fn run(&mut self) -> SimResult {
        // Pass an atomic bool that will never be set to true
        let finished = Rc::new(AtomicBool::new(false));
        self.spawn_registered();
        self.executor.run(finished)
    }

    /// Run until the `event` fires or no task can make any more progress.
    pub fn run_until(&mut self, event: Eventable) -> SimResult {
        // Create an atomic bool that is set to true as soon as the event fires.
        let finished = Rc::new(AtomicBool::new(false));
        {
            let finished = finished.clone();
            self.executor.spawn(async move {
                event.listen().await;
                finished.store(true, Release);
                Ok(())
            });
        }

        self.spawn_registered();
        self.executor.run(finished)
    }

    fn spawn_registered(&self) {
        let registered: Vec<Component> = self.registered.borrow_mut().drain(..).collect();
        debug!(self.toplevel ; "Spawning {} components", registered.len());
        for component in registered {
            self.executor.spawn(async move { component.run().await });
        }
    }

    pub fn spawn(&self, future: impl Future<Output = SimResult> + 'static) {
        self.executor.spawn(future);
    }

    #[must_use]
    pub fn num_registered(&self) -> usize {
        self.registered.borrow().len()
    }

    #[must_use]
    pub fn top(&self) -> &Rc<Entity> {
        &self.toplevel
    }

    #[must_use]
    pub fn tracker(&self) -> Tracker {
        self.tracker.clone()
    }
}

/// Create a default engine that sends warnings and errors to stdout.
///
/// This is provided to keep documentation examples simple with fewer
/// concepts to have to consider at once.
impl Default for Engine {
    fn default() -> Self {
        let tracker = stdout_tracker(log::Level::Warn);
        Self::new(&tracker)
    }
}
