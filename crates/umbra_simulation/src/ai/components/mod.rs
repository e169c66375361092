//! AI components

pub mod config;
pub mod detector;
pub mod route;
pub mod target;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod config_tests;

// Re-export all components
pub use config::*;
pub use detector::*;
pub use route::*;
pub use target::*;
