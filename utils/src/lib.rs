//! Shared utilities for the agora governance stack.

pub mod logging;

pub use logging::init_test_tracing;
