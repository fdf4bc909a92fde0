//! Infrastructure layer
//!
//! Platform storage backends and environment configuration.

pub mod config;
pub mod platform;

pub use config::*;
pub use platform::*;
