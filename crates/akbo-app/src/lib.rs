//! # Akbo Application
//!
//! Wires adapters to configuration and exposes the `akbo` command line:
//! the API server and the developer task runner.

pub mod commands;
pub mod logging;
pub mod tasks;
