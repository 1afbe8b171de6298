//! Library side of the `econdash` command: logging, configuration and
//! terminal tables.

pub mod config;
pub mod logging;
pub mod summary;
