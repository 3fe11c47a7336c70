// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Board configuration.
//!
//! The configuration is built up from, in increasing order of priority:
//!  - the built-in defaults,
//!  - an optional TOML file,
//!  - `GALTON_` prefixed environment variables (e.g. `GALTON_BINS=7`),
//!  - values given on the command line.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use galton_engine::sim_error;
use galton_engine::types::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Prefix of the environment variables that configure the board.
pub const ENV_PREFIX: &str = "GALTON_";

/// Smallest board that can be built: a single row with one router.
pub const MIN_BINS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of marbles dropped into the board.
    pub marbles: usize,

    /// Number of bins at the bottom of the board.
    pub bins: usize,

    /// Seed for the routing decisions. Taken from entropy when not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            marbles: 1000,
            bins: 5,
            seed: None,
        }
    }
}

/// Values that take priority over every other configuration source.
///
/// Only the fields that are set replace the configured values.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BoardOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marbles: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bins: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl BoardConfig {
    /// Combine all configuration sources and validate the result.
    ///
    /// A `config_file` that is given must exist.
    pub fn load(config_file: Option<&Path>, overrides: &BoardOverrides) -> Result<Self, SimError> {
        let figment = Self::figment(config_file)?.merge(Serialized::defaults(overrides));
        let config: BoardConfig = figment
            .extract()
            .map_err(|e| SimError(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: Option<&Path>) -> Result<Figment, SimError> {
        let mut figment = Figment::new().merge(Serialized::defaults(BoardConfig::default()));

        if let Some(config_file) = config_file {
            if config_file.is_dir() {
                return sim_error!(format!("{} is not a file path", config_file.display()));
            }
            if !config_file.exists() {
                return sim_error!(format!("{} not found", config_file.display()));
            }
            figment = figment.merge(Toml::file(config_file));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn validate(&self) -> SimResult {
        if self.bins < MIN_BINS {
            return sim_error!(format!(
                "bins must be at least {MIN_BINS}, got {}",
                self.bins
            ));
        }
        Ok(())
    }

    /// Number of rows of routers between the source and the bins.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.bins - 1
    }

    /// Number of routers in the whole board.
    #[must_use]
    pub fn num_routers(&self) -> usize {
        self.bins * (self.bins - 1) / 2
    }
}
