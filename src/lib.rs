//! Prefab - project scaffolding preflight.
//!
//! Prefab reads a `prefab.toml` plan, checks the selected dependencies for
//! conflicts against a curated preset catalog, probes the host for the
//! tools the project type needs, and only then materializes the project
//! tree with rendered manifest fragments.

pub mod catalog;
pub mod commands;
pub mod compat;
pub mod deps;
pub mod env;
pub mod output;
pub mod plan;
pub mod registry;
pub mod scaffold;
pub mod utils;

pub use catalog::{Preset, PresetCatalog, ProjectType};
pub use compat::{CheckResult, CheckSeverity};
pub use deps::{DependencyRecord, Ecosystem};
pub use env::{EnvironmentInfo, EnvironmentRegistry};
pub use output::OutputFormat;
pub use plan::ScaffoldPlan;
pub use scaffold::{ReadinessReport, ScaffoldOrchestrator};

/// Crate version, from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
