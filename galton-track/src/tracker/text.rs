// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A tracker that writes one line of text per event.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;

use crate::tracker::{EntityManager, Track, TrackEvent};
use crate::{Id, Writer};

/// Writes events as `<id>: <event>` and log messages as `<id>:<LEVEL>: <msg>`.
pub struct TextTracker {
    entity_manager: EntityManager,
    writer: RefCell<Writer>,
}

impl TextTracker {
    /// Create a tracker writing to `writer`.
    pub fn new(entity_manager: EntityManager, writer: Writer) -> Self {
        Self {
            entity_manager,
            writer: RefCell::new(writer),
        }
    }

    fn write_line(&self, line: fmt::Arguments) {
        // Write errors are dropped
        writeln!(self.writer.borrow_mut(), "{line}").ok();
    }
}

impl Track for TextTracker {
    fn unique_id(&self) -> Id {
        self.entity_manager.next_id()
    }

    fn add_entity(&self, id: Id, full_name: &str) {
        self.entity_manager.register(id, full_name);
    }

    fn is_entity_enabled(&self, id: Id, level: log::Level) -> bool {
        self.entity_manager.is_enabled(id, level)
    }

    fn event(&self, by: Id, event: TrackEvent) {
        self.write_line(format_args!("{by}: {event}"));
    }

    fn log(&self, by: Id, level: log::Level, msg: fmt::Arguments) {
        self.write_line(format_args!("{by}:{level}: {msg}"));
    }

    fn shutdown(&self) {
        self.writer.borrow_mut().flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::rc::Rc;

    use regex::Regex;

    use super::*;
    use crate::entity::{Entity, toplevel};
    use crate::{Tracker, debug, info};

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    #[test]
    fn filtered_entities_log_at_their_level() {
        let output = Shared::default();
        let manager = EntityManager::new(log::Level::Info)
            .with_filter(Regex::new("bins").unwrap(), log::Level::Trace);
        let tracker: Tracker = Rc::new(TextTracker::new(manager, Box::new(output.clone())));

        let top = toplevel(&tracker, "top");
        let bins = Rc::new(Entity::new(&top, "bins"));
        info!(top ; "start");
        debug!(top ; "hidden");
        debug!(bins ; "{} bins", 4);
        tracker.shutdown();

        assert_eq!(
            output.text(),
            "1: created 2, top::bins\n1:INFO: start\n2:DEBUG: 4 bins\n"
        );
    }

    #[test]
    fn trace_events() {
        let output = Shared::default();
        let manager = EntityManager::new(log::Level::Trace);
        let tracker: Tracker = Rc::new(TextTracker::new(manager, Box::new(output.clone())));

        let top = toplevel(&tracker, "top");
        let bin = Entity::new(&top, "bin0");
        crate::connect!(top ; bin);
        drop(bin);

        assert_eq!(
            output.text(),
            "0: created 1, top\n1: created 2, top::bin0\n1: connect to 2\n1: destroyed 2\n"
        );
    }
}
