//! Library side of the `blocktime` command-line tool.

pub mod config;
pub mod inputs;
pub mod logging;
