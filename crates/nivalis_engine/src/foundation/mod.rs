//! Foundation module - Core utilities shared by every subsystem
//!
//! Currently this is only the logging bootstrap.

pub mod logging;
