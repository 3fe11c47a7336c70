// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Simulation components.
//!
//! Every component owns its ports and is registered with the
//! [`Engine`](galton_engine::engine::Engine) on construction so that its
//! `run()` is spawned when the simulation starts. Components forward the end
//! of their input stream by closing all of their outputs once their input has
//! closed.

pub mod completion;
pub mod connect;
pub mod router;
pub mod sink;
pub mod source;
pub mod types;
