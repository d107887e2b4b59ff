//! Domain layer — pure types, validation, and pipeline vocabulary.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod environment;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::LauncherConfig;
pub use environment::{Activation, Platform};
pub use error::{BootstrapError, ConfigError};
pub use models::ModelListing;
pub use pipeline::{BootstrapReport, Policy, Step, StepOutcome};
