//! Shared utilities for the Becoming session library.

pub mod logging;

pub use logging::init_tracing;
