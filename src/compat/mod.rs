//! Dependency compatibility checks.
//!
//! All checks are pure functions over a candidate selection: they return
//! descriptive findings for the caller to act on and never fail themselves.
//! Empty selections are trivially conflict-free.

use serde::Serialize;

use crate::catalog::{ExclusionRule, PresetCatalog, ProjectType};
use crate::deps::{DependencyRecord, Ecosystem};
use crate::plan::ScaffoldPlan;

/// Severity attached to an advisory finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CheckSeverity {
    Pass,
    Info,
    Warning,
    Error,
}

/// One advisory finding produced by a compatibility or environment check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub category: String,
    pub severity: CheckSeverity,
    pub message: String,
    pub suggested_fix: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            severity: CheckSeverity::Pass,
            message: String::new(),
            suggested_fix: None,
        }
    }

    pub fn error(name: &str, category: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            severity: CheckSeverity::Error,
            message: message.to_string(),
            suggested_fix: None,
        }
    }

    pub fn warning(name: &str, category: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            severity: CheckSeverity::Warning,
            message: message.to_string(),
            suggested_fix: None,
        }
    }

    pub fn info(name: &str, category: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            severity: CheckSeverity::Info,
            message: message.to_string(),
            suggested_fix: None,
        }
    }

    pub fn with_fix(mut self, fix: &str) -> Self {
        self.suggested_fix = Some(fix.to_string());
        self
    }
}

/// True iff every record shares the same ecosystem tag.
///
/// Manifests are per-ecosystem; a mixed selection is a user error to flag,
/// not to merge silently.
pub fn are_compatible(records: &[DependencyRecord]) -> bool {
    let mut first: Option<&Ecosystem> = None;
    for record in records {
        match first {
            None => first = Some(&record.ecosystem),
            Some(eco) if *eco == record.ecosystem => {}
            Some(_) => return false,
        }
    }
    true
}

/// Detect groups requesting the same (ecosystem, name) at different versions.
///
/// One finding per conflicting group, in first-occurrence order.
pub fn check_version_conflicts(records: &[DependencyRecord]) -> Vec<String> {
    let mut conflicts = Vec::new();
    let mut seen_groups: Vec<(&Ecosystem, &str)> = Vec::new();

    for record in records {
        let key = (&record.ecosystem, record.name.as_str());
        if seen_groups.contains(&key) {
            continue;
        }
        seen_groups.push(key);

        // Distinct versions requested for this group, in occurrence order
        let mut versions: Vec<&str> = Vec::new();
        for other in records {
            if other.ecosystem == record.ecosystem
                && other.name == record.name
                && !versions.contains(&other.version.as_str())
            {
                versions.push(&other.version);
            }
        }

        if versions.len() > 1 {
            conflicts.push(format!(
                "Version conflict for {} dependency '{}': versions {} are requested",
                record.ecosystem,
                record.name,
                versions.join(", ")
            ));
        }
    }

    conflicts
}

/// Detect version collisions plus declared mutually-exclusive pairs.
///
/// Exclusion matching is a symmetric pairwise scan over the rule table;
/// O(n^2) over a selection that rarely exceeds twenty entries.
pub fn dependency_conflicts(
    records: &[DependencyRecord],
    exclusions: &[ExclusionRule],
) -> Vec<String> {
    let mut conflicts = check_version_conflicts(records);

    for (i, a) in records.iter().enumerate() {
        for b in records.iter().skip(i + 1) {
            if a.ecosystem != b.ecosystem {
                continue;
            }
            if exclusions
                .iter()
                .any(|rule| rule.matches(&a.ecosystem, &a.name, &b.name))
            {
                conflicts.push(format!(
                    "'{}' and '{}' are incompatible and cannot be used in the same project",
                    a.name, b.name
                ));
            }
        }
    }

    conflicts
}

/// Version allow-list check with an open-world default.
///
/// True when the preset is absent from the filtered catalog, when its
/// allow-list is empty, or when the version is listed. False only for a
/// known preset with a non-empty allow-list that omits the version.
pub fn is_version_compatible(
    catalog: &PresetCatalog,
    project_type: &ProjectType,
    preset_display_name: &str,
    version: &str,
) -> bool {
    match catalog.find_preset(project_type, preset_display_name) {
        Some(preset) => {
            preset.compatible_versions.is_empty()
                || preset.compatible_versions.contains(&version)
        }
        None => true,
    }
}

/// Whether a project type's profile accepts an ecosystem.
/// Custom project types accept any ecosystem.
pub fn is_compatible_with_project_type(project_type: &ProjectType, ecosystem: &Ecosystem) -> bool {
    project_type.accepts(ecosystem)
}

/// Run the full compatibility suite over a scaffold plan.
///
/// Findings are advisory: errors block scaffolding, warnings do not.
/// Allow-list misses are warnings unless the plan's `strict_versions`
/// policy upgrades them.
pub fn run_compat_checks(plan: &ScaffoldPlan, catalog: &PresetCatalog) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let project_type = plan.project_type();
    let records = &plan.dependencies;

    // Check 1: single ecosystem per generation pass
    if are_compatible(records) {
        results.push(CheckResult::pass("Ecosystem homogeneity", "dependencies"));
    } else {
        let mut tags: Vec<&str> = Vec::new();
        for record in records {
            if !tags.contains(&record.ecosystem.label()) {
                tags.push(record.ecosystem.label());
            }
        }
        results.push(
            CheckResult::error(
                "Ecosystem homogeneity",
                "dependencies",
                &format!("Selected dependencies span multiple ecosystems: {}", tags.join(", ")),
            )
            .with_fix("Split the selection into one plan per ecosystem"),
        );
    }

    // Check 2: every record accepted by the project type's profile
    let mut rejected = false;
    for record in records {
        if !is_compatible_with_project_type(&project_type, &record.ecosystem) {
            rejected = true;
            results.push(
                CheckResult::error(
                    "Project type compatibility",
                    "dependencies",
                    &format!(
                        "'{}' is a {} dependency, which {} projects do not accept",
                        record.name, record.ecosystem, project_type
                    ),
                )
                .with_fix(&format!(
                    "Pick a {} dependency or change the project type",
                    accepted_labels(&project_type)
                )),
            );
        }
    }
    if !rejected {
        results.push(CheckResult::pass("Project type compatibility", "dependencies"));
    }

    // Check 3: version collisions and declared exclusive pairs
    let exclusions = plan.exclusion_rules();
    let conflicts = dependency_conflicts(records, &exclusions);
    if conflicts.is_empty() {
        results.push(CheckResult::pass("Dependency conflicts", "dependencies"));
    } else {
        for conflict in conflicts {
            results.push(
                CheckResult::error("Dependency conflicts", "dependencies", &conflict)
                    .with_fix("Remove one of the conflicting dependencies"),
            );
        }
    }

    // Check 4: versions against the preset allow-lists
    for record in records {
        let known = catalog
            .presets_for_project_type(&project_type)
            .into_iter()
            .find(|p| p.artifact == record.name || p.display_name == record.name);
        if let Some(preset) = known {
            if !is_version_compatible(catalog, &project_type, preset.display_name, &record.version) {
                let qualifier = if is_newer_than_all(&record.version, preset.compatible_versions) {
                    "newer than"
                } else {
                    "outside"
                };
                let message = format!(
                    "Version {} of '{}' is {} the known-compatible set ({})",
                    record.version,
                    record.name,
                    qualifier,
                    preset.compatible_versions.join(", ")
                );
                let fix = format!(
                    "Use the recommended version {}",
                    preset.default_version
                );
                let finding = if plan.policies.strict_versions {
                    CheckResult::error("Version compatibility", "dependencies", &message)
                } else {
                    CheckResult::warning("Version compatibility", "dependencies", &message)
                };
                results.push(finding.with_fix(&fix));
            }
        }
    }

    results
}

/// Whether `version` parses as semver and sorts above every listed version.
/// Non-semver versions never qualify.
fn is_newer_than_all(version: &str, listed: &[&str]) -> bool {
    let Ok(candidate) = semver::Version::parse(version) else {
        return false;
    };
    listed.iter().all(|v| match semver::Version::parse(v) {
        Ok(parsed) => candidate > parsed,
        Err(_) => false,
    })
}

fn accepted_labels(project_type: &ProjectType) -> String {
    let accepted = project_type.accepted_ecosystems();
    if accepted.is_empty() {
        "any".to_string()
    } else {
        accepted
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join("/")
    }
}
