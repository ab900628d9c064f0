//! Configuration loading for the payroll engine.
//!
//! This module loads organisation settings, the access policy and the
//! employee directory from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded payroll for: {}", config.settings().organisation);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AccessPolicy, EmployeeDirectory, PayrollSettings};
