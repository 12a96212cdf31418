//! # aqdash common
//!
//! Shared data model, error type and logging setup used across the aqdash
//! workspace.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{AqError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use types::*;
