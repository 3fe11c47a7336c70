// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A one-shot event.
//!
//! A [`Once`] starts untriggered. Listeners that wait on it are woken when it
//! is triggered, and any listener that arrives later completes immediately.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::task::{Poll, Waker};

use futures::future::poll_fn;

use crate::sim_error;
use crate::traits::{BoxFuture, Event};
use crate::types::SimResult;

#[derive(Default)]
struct Shared {
    triggered: Cell<bool>,
    waiting: RefCell<Vec<Waker>>,
}

/// Handles are cheap to clone and all refer to the same event.
#[derive(Clone, Default)]
pub struct Once {
    shared: Rc<Shared>,
}

impl Once {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the event and wake every listener.
    ///
    /// The event can only be triggered once, a second call is an error.
    pub fn notify(&self) -> SimResult {
        if self.shared.triggered.replace(true) {
            return sim_error!("once event already triggered");
        }
        for waker in self.shared.waiting.take() {
            waker.wake();
        }
        Ok(())
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.shared.triggered.get()
    }
}

impl Event for Once {
    fn listen(&self) -> BoxFuture<'static, ()> {
        let shared = self.shared.clone();
        Box::pin(poll_fn(move |cx| {
            if shared.triggered.get() {
                Poll::Ready(())
            } else {
                shared.waiting.borrow_mut().push(cx.waker().clone());
                Poll::Pending
            }
        }))
    }
}
