// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The marbles that are dropped through the board.
//!
//! A marble carries no payload. It only has the unique id used to follow it
//! through the trace and the order in which it was dropped.

use std::fmt;
use std::rc::Rc;

use galton_engine::traits::SimObject;
use galton_track::entity::Entity;
use galton_track::{Id, Unique, create, create_id};

#[derive(Clone, Debug)]
pub struct Marble {
    id: Id,
    index: usize,
}

impl Marble {
    #[must_use]
    pub fn new(created_by: &Rc<Entity>, index: usize) -> Self {
        let marble = Self {
            id: create_id!(created_by),
            index,
        };
        create!(created_by ; marble);
        marble
    }

    /// The position of this marble in the order they were dropped.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl SimObject for Marble {}

impl fmt::Display for Marble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marble{}", self.index)
    }
}

impl Unique for Marble {
    fn id(&self) -> Id {
        self.id
    }
}

/// Generates a fixed number of marbles.
pub struct MarbleGen {
    created_by: Rc<Entity>,
    num_marbles: usize,
    num_created: usize,
}

impl MarbleGen {
    #[must_use]
    pub fn new(created_by: &Rc<Entity>, num_marbles: usize) -> Self {
        Self {
            created_by: created_by.clone(),
            num_marbles,
            num_created: 0,
        }
    }
}

impl Iterator for MarbleGen {
    type Item = Marble;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_created == self.num_marbles {
            return None;
        }

        let marble = Marble::new(&self.created_by, self.num_created);
        self.num_created += 1;
        Some(marble)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_marbles - self.num_created;
        (remaining, Some(remaining))
    }
}
