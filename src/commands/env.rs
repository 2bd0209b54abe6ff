//! Probe the host environment and report detected tools

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::env::EnvironmentRegistry;
use crate::output::{OutputFormat, PrefabOutput};

pub fn run(format: OutputFormat) -> Result<()> {
    let registry = EnvironmentRegistry::new();

    // Probing spawns a handful of processes; show a spinner in text mode
    let spinner = if format.is_json() {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Probing development tools...");
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let environments = registry.all_environments();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if format.is_json() {
        let output = PrefabOutput::new("env").with_data(serde_json::json!({
            "tools": environments,
        }));
        println!("{}", output.to_json());
        return Ok(());
    }

    println!("{}", "Detected tools:".bold());
    for info in &environments {
        if info.available {
            let version = info.version.as_deref().unwrap_or("unknown version");
            let path = info
                .install_path
                .as_ref()
                .map(|p| format!("  {}", p.display()))
                .unwrap_or_default();
            println!(
                "  {} {} {}{}",
                "✓".green(),
                info.tool,
                version.green(),
                path.dimmed()
            );
        } else {
            println!("  {} {} {}", "✗".red(), info.tool, "not available".dimmed());
        }
    }

    let available = environments.iter().filter(|e| e.available).count();
    println!();
    println!(
        "{} {}/{} tools available",
        "Summary:".bold(),
        available,
        environments.len()
    );

    Ok(())
}
