//! # Visualize Core
//!
//! Math helpers and resource pools shared by the Visualize debug drawer.

pub mod math;
pub mod pool;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
