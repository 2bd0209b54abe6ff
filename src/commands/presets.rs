//! List curated dependency presets for a project type

use anyhow::Result;
use colored::Colorize;

use crate::catalog::{PresetCatalog, ProjectType};
use crate::output::{OutputFormat, PrefabOutput};

pub fn run(project_type: &str, format: OutputFormat) -> Result<()> {
    let catalog = PresetCatalog::builtin();
    let parsed = ProjectType::parse(project_type);
    let presets = catalog.presets_for_project_type(&parsed);

    if format.is_json() {
        let output = PrefabOutput::new("presets").with_data(serde_json::json!({
            "project_type": parsed.label(),
            "presets": presets,
        }));
        println!("{}", output.to_json());
        return Ok(());
    }

    println!("{} {}", "Presets for".bold(), parsed.label().cyan().bold());
    println!();

    if presets.is_empty() {
        println!(
            "  {}",
            "No curated presets for this project type".dimmed()
        );
        return Ok(());
    }

    for preset in presets {
        let tag = if preset.required {
            "(required)".red().to_string()
        } else {
            "(optional)".dimmed().to_string()
        };
        println!(
            "  {} {} {}",
            preset.display_name.green(),
            preset.default_version,
            tag
        );
        println!("      {}", preset.description.dimmed());
        println!(
            "      {} {}  {} {}",
            "artifact:".dimmed(),
            preset.artifact,
            "compatible:".dimmed(),
            preset.compatible_versions.join(", ")
        );
    }

    Ok(())
}
