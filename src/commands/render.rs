//! Render manifest fragments for the plan's dependencies

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::output::{OutputFormat, PrefabOutput};
use crate::plan::{ScaffoldPlan, PLAN_FILE};
use crate::scaffold::{manifest_file_name, manifest_fragments};

pub fn run(plan_path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let path = plan_path.unwrap_or_else(|| PathBuf::from(PLAN_FILE));
    let plan = ScaffoldPlan::load_from(&path)?;
    let fragments = manifest_fragments(&plan.dependencies)?;

    if format.is_json() {
        let rendered: Vec<_> = fragments
            .iter()
            .map(|(ecosystem, fragment)| {
                serde_json::json!({
                    "ecosystem": ecosystem.label(),
                    "file": manifest_file_name(ecosystem),
                    "fragment": fragment,
                })
            })
            .collect();
        let output = PrefabOutput::new("render").with_data(serde_json::json!({
            "project": plan.project.name,
            "manifests": rendered,
        }));
        println!("{}", output.to_json());
        return Ok(());
    }

    if fragments.is_empty() {
        println!("{}", "Plan declares no dependencies".dimmed());
        return Ok(());
    }

    for (ecosystem, fragment) in &fragments {
        println!(
            "{} {} {}",
            "──".dimmed(),
            manifest_file_name(ecosystem).cyan().bold(),
            format!("({})", ecosystem).dimmed()
        );
        print!("{}", fragment);
        println!();
    }

    Ok(())
}
