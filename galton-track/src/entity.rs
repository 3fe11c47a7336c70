// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Named entities.
//!
//! Each entity knows its parent, so names are hierarchical:
//! `top::row3::router2` is `router2` inside `row3` inside `top`. The full name
//! is what tracker filters are matched against.

use std::fmt;
use std::rc::Rc;

use crate::{Id, NO_ID, Tracker, create, destroy};

const JOIN: &str = "::";

/// A named part of the simulation.
///
/// Creating an entity allocates its [`Id`] and reports the creation to the
/// tracker, dropping it reports its destruction.
pub struct Entity {
    /// Id used in log and trace output.
    pub id: Id,

    /// Tracker shared by the whole hierarchy.
    pub tracker: Tracker,

    full_name: String,
    parent: Option<Rc<Entity>>,
}

impl Entity {
    /// Create an entity called `name` inside `parent`.
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str) -> Self {
        let full_name = format!("{}{JOIN}{name}", parent.full_name);
        Self::register(&parent.tracker, Some(parent.clone()), full_name)
    }

    fn register(tracker: &Tracker, parent: Option<Rc<Entity>>, full_name: String) -> Self {
        let id = tracker.unique_id();
        tracker.add_entity(id, &full_name);
        let entity = Self {
            id,
            tracker: tracker.clone(),
            full_name,
            parent,
        };
        create!(entity);
        entity
    }

    /// The last component of the name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit(JOIN)
            .next()
            .unwrap_or(&self.full_name)
    }

    /// The names of every ancestor and this entity, joined with `::`.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The id of the parent, or [`NO_ID`] for the top level.
    #[must_use]
    pub fn parent_id(&self) -> Id {
        self.parent.as_ref().map_or(NO_ID, |parent| parent.id)
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        destroy!(self);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, {})", self.id, self.full_name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Create the top of an entity hierarchy.
pub fn toplevel(tracker: &Tracker, name: &str) -> Rc<Entity> {
    Rc::new(Entity::register(tracker, None, name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::check_and_clear;
    use crate::test_init;

    #[test]
    fn hierarchical_names() {
        let (_, tracker) = test_init!(1);
        let top = toplevel(&tracker, "top");
        let row = Rc::new(Entity::new(&top, "row1"));
        let router = Entity::new(&row, "router0");

        assert_eq!(router.full_name(), "top::row1::router0");
        assert_eq!(router.name(), "router0");
        assert_eq!(format!("{router}"), "top::row1::router0");
        assert_eq!(top.name(), "top");
        assert_eq!(format!("{top}"), "top");
    }

    #[test]
    fn created_and_destroyed_by_parent() {
        let (test_tracker, tracker) = test_init!(1, log::Level::Trace);
        let top = toplevel(&tracker, "top");
        assert_eq!(top.parent_id(), NO_ID);

        let bins = Entity::new(&top, "bins");
        assert_eq!(bins.parent_id(), top.id);
        drop(bins);

        check_and_clear(
            &test_tracker,
            &[
                "^0: created 1, top$",
                "^1: created 2, top::bins$",
                "^1: destroyed 2$",
            ],
        );
    }
}
