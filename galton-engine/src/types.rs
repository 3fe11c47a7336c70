// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The error type shared by the simulation crates.

use std::error::Error;
use std::fmt;

/// Return an `Err(SimError)` built from anything that implements `ToString`.
#[macro_export]
macro_rules! sim_error {
    ($msg:expr) => {
        Err($crate::types::SimError($msg.to_string()))
    };
}

/// An error that stops the simulation.
///
/// Messages start with the name of the entity at fault where there is one,
/// for example `top::completion signalled too many times`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimError(pub String);

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl Error for SimError {}

pub type SimResult<T = ()> = Result<T, SimError>;
