//! Generate the project tree described by the plan

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::catalog::PresetCatalog;
use crate::env::EnvironmentRegistry;
use crate::output::{OutputFormat, PrefabOutput};
use crate::plan::{ScaffoldPlan, PLAN_FILE};
use crate::scaffold::{FsMaterializer, ScaffoldOrchestrator};

pub fn run(
    plan_path: Option<PathBuf>,
    output_dir: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    let path = plan_path.unwrap_or_else(|| PathBuf::from(PLAN_FILE));
    let plan = ScaffoldPlan::load_from(&path)?;

    let orchestrator =
        ScaffoldOrchestrator::new(PresetCatalog::builtin(), EnvironmentRegistry::new());

    let mut materializer = FsMaterializer::new(&output_dir);
    let summary = orchestrator.scaffold(&plan, &mut materializer)?;

    if format.is_json() {
        let output = PrefabOutput::new("scaffold").with_data(serde_json::json!({
            "project": plan.project.name,
            "output_dir": output_dir,
            "created_dirs": summary.created_dirs,
            "written_files": summary.written_files,
        }));
        println!("{}", output.to_json());
        return Ok(());
    }

    println!(
        "{} Scaffolded {} in {}",
        "✓".green().bold(),
        plan.project.name.cyan(),
        output_dir.display()
    );
    println!();
    for dir in &summary.created_dirs {
        println!("  {} {}/", "dir".dimmed(), dir.display());
    }
    for file in &summary.written_files {
        println!("  {} {}", "file".dimmed(), file.display());
    }

    Ok(())
}
