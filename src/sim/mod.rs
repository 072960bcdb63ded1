//! Simulation Support.
//!
//! Loading of memory images for the CLI driver.

/// Flat-image loader.
pub mod loader;
