//! CLI command implementations

pub mod check;
pub mod env;
pub mod init;
pub mod latest;
pub mod presets;
pub mod render;
pub mod scaffold;
