//! Shared utilities for the bodega messaging service.
//!
//! Cross-cutting concerns used by the server crate and its tests:
//! logging setup and a clock abstraction for testable timestamps.

pub mod logger;
pub mod time;
