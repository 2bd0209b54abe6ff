//! Run the full preflight suite over the plan file

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::catalog::PresetCatalog;
use crate::env::EnvironmentRegistry;
use crate::output::{print_check_result, OutputFormat, PrefabOutput};
use crate::plan::{ScaffoldPlan, PLAN_FILE};
use crate::scaffold::ScaffoldOrchestrator;

/// Returns the readiness verdict so the caller can set the exit code
pub fn run(plan_path: Option<PathBuf>, format: OutputFormat) -> Result<bool> {
    let path = plan_path.unwrap_or_else(|| PathBuf::from(PLAN_FILE));
    let plan = ScaffoldPlan::load_from(&path)?;

    let orchestrator =
        ScaffoldOrchestrator::new(PresetCatalog::builtin(), EnvironmentRegistry::new());
    let report = orchestrator.preflight(&plan);

    if format.is_json() {
        let output = PrefabOutput::new("check")
            .with_success(report.ready)
            .with_ready(report.ready)
            .with_issues(&report.findings)
            .with_data(serde_json::json!({
                "project": plan.project.name,
                "project_type": plan.project_type().label(),
                "missing_tools": report.missing_tools,
            }));
        println!("{}", output.to_json());
        return Ok(report.ready);
    }

    print_header(&plan, &path);
    println!("{}", "Checks:".bold());
    for finding in &report.findings {
        print_check_result(finding);
    }
    println!();

    if report.ready {
        println!("{} Plan is ready to scaffold", "✓".green().bold());
    } else {
        println!("{} Plan is not ready to scaffold", "✗".red().bold());
        if !report.missing_tools.is_empty() {
            println!(
                "  {} {}",
                "missing tools:".dimmed(),
                report.missing_tools.join(", ")
            );
        }
    }

    Ok(report.ready)
}

fn print_header(plan: &ScaffoldPlan, path: &Path) {
    println!(
        "{} {} ({})",
        "Checking".bold(),
        plan.project.name.cyan(),
        plan.project_type().label()
    );
    println!("{} {}", "plan:".dimmed(), path.display());
    println!();
}
