//! Query a package registry for the latest published version

use anyhow::Result;
use colored::Colorize;

use crate::deps::Ecosystem;
use crate::output::{OutputFormat, PrefabOutput};
use crate::registry::RegistryClient;

pub fn run(ecosystem: &str, package: &str, format: OutputFormat) -> Result<()> {
    let ecosystem = Ecosystem::parse(ecosystem);

    if !format.is_json() {
        println!("Looking up {} on the {} registry...", package.cyan(), ecosystem);
        println!();
    }

    let client = RegistryClient::new();
    let version = client.latest_version(&ecosystem, package)?;

    if format.is_json() {
        let output = PrefabOutput::new("latest").with_data(serde_json::json!({
            "ecosystem": ecosystem.label(),
            "package": package,
            "latest": version,
        }));
        println!("{}", output.to_json());
    } else {
        println!("{} {} {}", "✓".green(), package, version.green().bold());
    }

    Ok(())
}
