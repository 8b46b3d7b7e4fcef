//! Foundation module - Utilities shared by the math types
//!
//! This module provides:
//! - Logging setup for binaries and tests

pub mod logging;
