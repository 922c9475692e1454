//! Execution of the standard solve mode.

pub mod execution;
