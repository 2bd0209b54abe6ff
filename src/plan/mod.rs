//! The scaffold plan file (`prefab.toml`).
//!
//! A plan declares the project, its selected dependencies and the policies
//! the preflight checks run under. Loading is strict: unknown project types
//! are accepted (they parse to the catch-all), but malformed TOML and
//! missing required fields fail with context.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::{default_exclusions, ExclusionRule, ProjectType};
use crate::deps::DependencyRecord;

/// Default plan file name, looked up in the working directory
pub const PLAN_FILE: &str = "prefab.toml";

/// The `[project]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name used in generated manifests
    pub name: String,
    /// Project type label, e.g. "Java Maven" or "React"
    #[serde(rename = "type")]
    pub project_type: String,
}

/// The `[compat]` section: plan-local additions to the built-in rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompatSection {
    /// Extra mutually-exclusive pairs, merged after the built-in table
    #[serde(default)]
    pub extra_exclusions: Vec<ExclusionRule>,
}

/// The `[policies]` section controlling check strictness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policies {
    /// Upgrade allow-list misses from warning to error
    #[serde(default)]
    pub strict_versions: bool,
    /// Treat missing required host tools as blocking
    #[serde(default = "default_true")]
    pub require_tools: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            strict_versions: false,
            require_tools: true,
        }
    }
}

/// A parsed scaffold plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldPlan {
    pub project: ProjectSection,
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencyRecord>,
    #[serde(default)]
    pub compat: CompatSection,
    #[serde(default)]
    pub policies: Policies,
}

impl ScaffoldPlan {
    /// Load the plan from `prefab.toml` in the current directory
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(PLAN_FILE))
    }

    /// Load a plan from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        let plan: ScaffoldPlan = toml::from_str(&content)
            .with_context(|| format!("Failed to parse plan file: {}", path.display()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load the plan if the file exists, otherwise return None
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Ok(Some(Self::load_from(path)?))
        } else {
            Ok(None)
        }
    }

    /// Write the plan to a path as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize plan to TOML")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write plan file: {}", path.display()))?;
        Ok(())
    }

    /// Structural validation beyond what serde enforces
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            anyhow::bail!("project.name must not be empty");
        }
        if self.project.project_type.trim().is_empty() {
            anyhow::bail!("project.type must not be empty");
        }
        for dep in &self.dependencies {
            if !dep.is_valid() {
                anyhow::bail!("dependency entry with empty name or ecosystem");
            }
        }
        Ok(())
    }

    /// The parsed project type (unknown labels become the catch-all)
    pub fn project_type(&self) -> ProjectType {
        ProjectType::parse(&self.project.project_type)
    }

    /// Built-in exclusion table plus this plan's extra pairs
    pub fn exclusion_rules(&self) -> Vec<ExclusionRule> {
        let mut rules = default_exclusions();
        rules.extend(self.compat.extra_exclusions.iter().cloned());
        rules
    }

    /// A small known-good plan, used as the `init` starter and in tests
    pub fn example() -> Self {
        use crate::deps::{DependencyScope, Ecosystem};
        Self {
            project: ProjectSection {
                name: "my-app".to_string(),
                project_type: "Java Maven".to_string(),
            },
            dependencies: vec![
                DependencyRecord::new(
                    Ecosystem::Maven,
                    "org.junit.jupiter:junit-jupiter",
                    "5.10.0",
                )
                .with_scope(DependencyScope::Test)
                .with_description("Modern testing framework"),
                DependencyRecord::new(
                    Ecosystem::Maven,
                    "ch.qos.logback:logback-classic",
                    "1.4.11",
                )
                .with_description("Logging framework"),
            ],
            compat: CompatSection::default(),
            policies: Policies::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::Ecosystem;

    #[test]
    fn test_parse_minimal_plan() {
        let toml_str = r#"
[project]
name = "demo"
type = "Python"
"#;
        let plan: ScaffoldPlan = toml::from_str(toml_str).unwrap();
        assert_eq!(plan.project.name, "demo");
        assert_eq!(plan.project_type(), ProjectType::Python);
        assert!(plan.dependencies.is_empty());
        assert!(!plan.policies.strict_versions);
        assert!(plan.policies.require_tools);
    }

    #[test]
    fn test_parse_plan_with_dependencies() {
        let toml_str = r#"
[project]
name = "demo"
type = "Node.js"

[[dependency]]
ecosystem = "npm"
name = "express"
version = "4.18.2"

[[dependency]]
ecosystem = "npm"
name = "lodash"
"#;
        let plan: ScaffoldPlan = toml::from_str(toml_str).unwrap();
        assert_eq!(plan.dependencies.len(), 2);
        assert_eq!(plan.dependencies[0].name, "express");
        // Missing version defaults to the sentinel
        assert_eq!(plan.dependencies[1].version, "latest");
    }

    #[test]
    fn test_parse_extra_exclusions() {
        let toml_str = r#"
[project]
name = "demo"
type = "Node.js"

[compat]
extra_exclusions = [
    { ecosystem = "npm", first = "moment", second = "dayjs" },
]
"#;
        let plan: ScaffoldPlan = toml::from_str(toml_str).unwrap();
        let rules = plan.exclusion_rules();
        assert!(rules
            .iter()
            .any(|r| r.matches(&Ecosystem::Npm, "moment", "dayjs")));
        // Built-in rules are still present
        assert!(rules
            .iter()
            .any(|r| r.matches(&Ecosystem::Pip, "django", "flask")));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let plan = ScaffoldPlan {
            project: ProjectSection {
                name: "  ".to_string(),
                project_type: "Python".to_string(),
            },
            dependencies: vec![],
            compat: CompatSection::default(),
            policies: Policies::default(),
        };
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_example_plan_round_trips() {
        let plan = ScaffoldPlan::example();
        let toml_str = toml::to_string_pretty(&plan).unwrap();
        let parsed: ScaffoldPlan = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.project.name, plan.project.name);
        assert_eq!(parsed.dependencies, plan.dependencies);
        parsed.validate().unwrap();
    }
}
