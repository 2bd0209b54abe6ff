//! Create a starter plan file in the current directory

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::output::{OutputFormat, PrefabOutput};
use crate::plan::{ScaffoldPlan, PLAN_FILE};

pub fn run(force: bool, format: OutputFormat) -> Result<()> {
    let path = Path::new(PLAN_FILE);

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            PLAN_FILE
        );
    }

    let plan = ScaffoldPlan::example();
    plan.save(path)?;

    if format.is_json() {
        let output = PrefabOutput::new("init").with_data(serde_json::json!({
            "plan_file": PLAN_FILE,
            "project_type": plan.project.project_type,
        }));
        println!("{}", output.to_json());
    } else {
        println!("{} Created {}", "✓".green(), PLAN_FILE.cyan());
        println!();
        println!("Next steps:");
        println!("  1. Edit {} to describe your project", PLAN_FILE);
        println!("  2. Run {} to verify the plan", "prefab check".cyan());
        println!("  3. Run {} to generate the tree", "prefab scaffold".cyan());
    }

    Ok(())
}
