// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Single-threaded cooperative executor.
//!
//! Tasks are polled in the order in which they were spawned or woken. A task
//! is only polled again once something has woken it, so a step polls exactly
//! the tasks that can make progress. The executor stops when no task is left
//! to poll, or when the `finished` flag passed to [`Executor::run`] is set.
//!
//! Because all tasks run on the same thread in a fixed order, a simulation is
//! reproducible whenever its components are.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::mem::ManuallyDrop;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Acquire;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use galton_track::entity::Entity;
use galton_track::trace;

use crate::types::SimResult;

static VTABLE: RawWakerVTable =
    RawWakerVTable::new(clone_raw_waker, wake_task, wake_task_by_ref, drop_raw_waker);

fn task_raw_waker(task: Rc<Task>) -> RawWaker {
    let ptr = Rc::into_raw(task) as *const ();
    RawWaker::new(ptr, &VTABLE)
}

fn waker_for_task(task: Rc<Task>) -> Waker {
    // Safety: the vtable functions only ever treat the data pointer as an
    // `Rc<Task>` and every waker owns exactly one reference count.
    unsafe { Waker::from_raw(task_raw_waker(task)) }
}

unsafe fn clone_raw_waker(data: *const ()) -> RawWaker {
    unsafe {
        let rc_task = ManuallyDrop::new(Rc::from_raw(data as *const Task));
        task_raw_waker(Rc::clone(&rc_task))
    }
}

unsafe fn wake_task(data: *const ()) {
    unsafe {
        let rc_task = Rc::from_raw(data as *const Task);
        let state = rc_task.executor_state.clone();
        state.new_tasks.borrow_mut().push(rc_task);
    }
}

unsafe fn wake_task_by_ref(data: *const ()) {
    unsafe {
        let rc_task = ManuallyDrop::new(Rc::from_raw(data as *const Task));
        rc_task
            .executor_state
            .new_tasks
            .borrow_mut()
            .push(Rc::clone(&rc_task));
    }
}

unsafe fn drop_raw_waker(data: *const ()) {
    unsafe {
        drop(Rc::from_raw(data as *const Task));
    }
}

struct Task {
    future: RefCell<Pin<Box<dyn Future<Output = SimResult>>>>,
    complete: Cell<bool>,
    executor_state: Rc<ExecutorState>,
}

impl Task {
    pub fn new(
        future: impl Future<Output = SimResult> + 'static,
        executor_state: Rc<ExecutorState>,
    ) -> Task {
        Task {
            future: RefCell::new(Box::pin(future)),
            complete: Cell::new(false),
            executor_state,
        }
    }

    fn poll(&self, context: &mut Context) -> Poll<SimResult> {
        // A task can be woken more than once before it is polled.
        if self.complete.get() {
            return Poll::Ready(Ok(()));
        }

        let result = self.future.borrow_mut().as_mut().poll(context);
        if result.is_ready() {
            self.complete.set(true);
        }
        result
    }
}

struct ExecutorState {
    task_queue: RefCell<Vec<Rc<Task>>>,
    new_tasks: RefCell<Vec<Rc<Task>>>,
}

impl ExecutorState {
    pub fn new() -> Self {
        Self {
            task_queue: RefCell::new(Vec::new()),
            new_tasks: RefCell::new(Vec::new()),
        }
    }
}

/// Single-threaded executor, see the [module documentation](self).
pub struct Executor {
    entity: Rc<Entity>,
    state: Rc<ExecutorState>,
}

impl Executor {
    #[must_use]
    pub fn new(top: &Rc<Entity>) -> Self {
        Self {
            entity: Rc::new(Entity::new(top, "executor")),
            state: Rc::new(ExecutorState::new()),
        }
    }

    pub fn spawn(&self, future: impl Future<Output = SimResult> + 'static) {
        self.state
            .new_tasks
            .borrow_mut()
            .push(Rc::new(Task::new(future, self.state.clone())));
    }

    pub fn run(&self, finished: Rc<AtomicBool>) -> SimResult {
        let mut num_steps: u64 = 0;
        loop {
            self.step(&finished)?;
            num_steps += 1;
            if finished.load(Acquire) {
                break;
            }

            if self.state.new_tasks.borrow().is_empty() {
                // Nothing has been woken, so nothing can make progress
                break;
            }
        }
        trace!(self.entity ; "stopped after {num_steps} steps");
        Ok(())
    }

    pub fn step(&self, finished: &Rc<AtomicBool>) -> SimResult {
        // Append new tasks created since the last step into the task queue
        let mut task_queue = self.state.task_queue.borrow_mut();
        task_queue.append(&mut self.state.new_tasks.borrow_mut());

        // Loop over all tasks, polling them. A task that is not ready will
        // have parked its waker wherever it is waiting.
        for task in task_queue.drain(..) {
            if finished.load(Acquire) {
                break;
            }

            let waker = waker_for_task(task.clone());
            let mut context = Context::from_waker(&waker);

            match task.poll(&mut context) {
                Poll::Ready(Err(e)) => {
                    // Error - return early
                    return Err(e);
                }
                Poll::Ready(Ok(())) => {
                    // Otherwise, drop task as it is complete
                }
                Poll::Pending => {
                    // Task will have parked itself waiting somewhere
                }
            }
        }
        Ok(())
    }
}
