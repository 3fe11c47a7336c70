// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Build the tracker selected on the command line.

use std::error::Error;
use std::fmt;
use std::io;
use std::rc::Rc;

use regex::Regex;

use crate::Tracker;
use crate::tracker::{DevNullTracker, EntityManager, TextTracker};

/// Options of the `stdout` tracker.
pub struct TrackerConfig<'a> {
    /// Without this every event is dropped.
    pub enable: bool,

    /// Level of the entities matching `filter_regex`, or of every entity when
    /// there is no filter.
    pub level: log::Level,

    /// Only entities whose full name matches are logged at `level`, the rest
    /// only report errors. Empty for no filter.
    pub filter_regex: &'a str,
}

impl Default for TrackerConfig<'_> {
    fn default() -> Self {
        Self {
            enable: false,
            level: log::Level::Warn,
            filter_regex: "",
        }
    }
}

/// The entity filter is not a valid regular expression.
#[derive(Debug)]
pub struct BadFilterError {
    filter: String,
    source: regex::Error,
}

impl fmt::Display for BadFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad entity filter '{}': {}", self.filter, self.source)
    }
}

impl Error for BadFilterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// The [`EntityManager`] implementing `config`'s levels and filter.
pub fn build_entity_manager(config: &TrackerConfig) -> Result<EntityManager, BadFilterError> {
    if config.filter_regex.is_empty() {
        return Ok(EntityManager::new(config.level));
    }

    let filter = Regex::new(config.filter_regex).map_err(|source| BadFilterError {
        filter: config.filter_regex.to_owned(),
        source,
    })?;
    Ok(EntityManager::new(log::Level::Error).with_filter(filter, config.level))
}

/// A [`TextTracker`] on `stdout` if enabled, otherwise a [`DevNullTracker`].
pub fn setup_trackers(config: &TrackerConfig) -> Result<Tracker, BadFilterError> {
    if !config.enable {
        return Ok(Rc::new(DevNullTracker));
    }

    let entity_manager = build_entity_manager(config)?;
    let stdout = Box::new(io::BufWriter::new(io::stdout()));
    Ok(Rc::new(TextTracker::new(entity_manager, stdout)))
}
