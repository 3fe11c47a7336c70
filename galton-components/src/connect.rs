// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Helper connection macros

pub use galton_engine::sim_error;
pub use galton_track::debug;
pub use paste::paste;

#[macro_export]
/// Connect an [OutPort](galton_engine::port::OutPort) port to an
/// [InPort](galton_engine::port::InPort)
///
/// Evaluates to the `SimResult` of the connection.
macro_rules! connect_port {
    ($from:expr, $from_port_name:ident => $to:expr, $to_port_name:ident) => {{
        $crate::connect::debug!($from.entity() ; "Connect {}.{} => {}.{}", $from, stringify!($from_port_name), $to, stringify!($to_port_name));
        $crate::connect::paste! {
            $from.[< connect_port_ $from_port_name >]($to.[< port_ $to_port_name >]())
        }
    }};
    ($from:expr, $from_port_name:ident, $from_index:expr => $to:expr, $to_port_name:ident) => {{
        let from_index: usize = $from_index;
        $crate::connect::debug!($from.entity() ; "Connect {}.{}[{}] => {}.{}", $from, stringify!($from_port_name), from_index, $to, stringify!($to_port_name));
        $crate::connect::paste! {
            $from.[< connect_port_ $from_port_name _i >](from_index, $to.[< port_ $to_port_name >]())
        }
    }};
}

#[macro_export]
/// Connect a tx port that is stored in a `RefCell<Option<>>`.
macro_rules! connect_tx {
    ($port:expr, $fn:ident ; $port_state:ident) => {
        match $port.borrow_mut().as_mut() {
            Some(port) => port.$fn($port_state),
            None => $crate::connect::sim_error!("tx port already in use"),
        }
    };
}

#[macro_export]
/// Access the state of an rx port that is stored in a `RefCell<Option<>>`.
macro_rules! port_rx {
    ($port:expr, $fn:ident) => {
        match $port.borrow().as_ref() {
            Some(port) => port.$fn(),
            None => $crate::connect::sim_error!("rx port already in use"),
        }
    };
}

#[macro_export]
/// Take a variable out of a `RefCell<Option<>>`.
///
/// Must be used within a function returning a `SimResult`; returns an error
/// if the variable has already been taken.
macro_rules! take_option {
    ($var:expr) => {
        match $var.borrow_mut().take() {
            Some(value) => value,
            None => return $crate::connect::sim_error!(concat!(stringify!($var), " already taken")),
        }
    };
}
