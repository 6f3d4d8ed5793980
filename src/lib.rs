// Copyright (c) 2016-2021 Fabian Schuiki

//! A front-end for a subset of Verilog.

#[macro_use]
extern crate log;

// Re-export everything from the common crate.
pub use verilite_common as common;
pub use crate::common::*;

pub use verilite_svlog as svlog;

pub mod driver;
