//! Scaffold orchestration: preflight gating and tree materialization.
//!
//! `preflight` runs every compatibility and environment check over a plan
//! and folds the findings into a readiness verdict. `scaffold` refuses to
//! touch the filesystem unless the preflight verdict is ready.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::catalog::{PresetCatalog, ProjectType};
use crate::compat::{run_compat_checks, CheckResult, CheckSeverity};
use crate::deps::{DependencyRecord, Ecosystem};
use crate::env::EnvironmentRegistry;
use crate::plan::ScaffoldPlan;

/// Preflight verdict over a plan.
///
/// `ready` holds exactly when no finding is an error and no required tool
/// is missing under the plan's `require_tools` policy.
#[derive(Debug, Serialize)]
pub struct ReadinessReport {
    pub findings: Vec<CheckResult>,
    pub missing_tools: Vec<String>,
    pub ready: bool,
}

impl ReadinessReport {
    /// Findings that block scaffolding
    pub fn blocking(&self) -> Vec<&CheckResult> {
        self.findings
            .iter()
            .filter(|f| f.severity == CheckSeverity::Error)
            .collect()
    }
}

/// Filesystem seam for tree materialization, swapped for a recorder in tests
pub trait TreeMaterializer {
    fn create_dir(&mut self, path: &Path) -> Result<()>;
    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()>;
}

/// Materializer that writes beneath a root directory
pub struct FsMaterializer {
    root: PathBuf,
}

impl FsMaterializer {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl TreeMaterializer for FsMaterializer {
    fn create_dir(&mut self, path: &Path) -> Result<()> {
        let full = self.root.join(path);
        std::fs::create_dir_all(&full)
            .with_context(|| format!("Failed to create directory: {}", full.display()))
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&full, contents)
            .with_context(|| format!("Failed to write file: {}", full.display()))
    }
}

/// What a scaffold run produced
#[derive(Debug, Serialize)]
pub struct ScaffoldSummary {
    pub created_dirs: Vec<PathBuf>,
    pub written_files: Vec<PathBuf>,
}

/// Drives preflight checks and tree materialization for a plan
pub struct ScaffoldOrchestrator {
    catalog: PresetCatalog,
    env: EnvironmentRegistry,
}

impl ScaffoldOrchestrator {
    pub fn new(catalog: PresetCatalog, env: EnvironmentRegistry) -> Self {
        Self { catalog, env }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn env(&self) -> &EnvironmentRegistry {
        &self.env
    }

    /// Run every check over the plan and fold the verdict
    pub fn preflight(&self, plan: &ScaffoldPlan) -> ReadinessReport {
        let mut findings = run_compat_checks(plan, &self.catalog);
        let project_type = plan.project_type();

        let missing_tools = self.env.missing_tools(&project_type);
        for tool in project_type.required_tools() {
            if self.env.is_available(tool) {
                findings.push(CheckResult::pass(tool, "environment"));
            } else {
                let message = format!("{} was not detected on this host", tool);
                let finding = if plan.policies.require_tools {
                    CheckResult::error(tool, "environment", &message)
                } else {
                    CheckResult::warning(tool, "environment", &message)
                };
                findings
                    .push(finding.with_fix(&format!("Install {} and ensure it is on PATH", tool)));
            }
        }

        let has_errors = findings
            .iter()
            .any(|f| f.severity == CheckSeverity::Error);
        let tools_block = plan.policies.require_tools && !missing_tools.is_empty();
        let ready = !has_errors && !tools_block;

        ReadinessReport {
            findings,
            missing_tools,
            ready,
        }
    }

    /// Materialize the project tree. Fails before touching the tree when
    /// preflight reports the plan not ready.
    pub fn scaffold(
        &self,
        plan: &ScaffoldPlan,
        materializer: &mut dyn TreeMaterializer,
    ) -> Result<ScaffoldSummary> {
        let report = self.preflight(plan);
        if !report.ready {
            let blocking: Vec<String> = report
                .blocking()
                .iter()
                .map(|f| f.message.clone())
                .filter(|m| !m.is_empty())
                .collect();
            if blocking.is_empty() {
                bail!(
                    "plan is not ready to scaffold: missing tools: {}",
                    report.missing_tools.join(", ")
                );
            }
            bail!("plan is not ready to scaffold: {}", blocking.join("; "));
        }

        let project_type = plan.project_type();
        let mut created_dirs = Vec::new();
        let mut written_files = Vec::new();

        for dir in layout_dirs(&project_type) {
            let path = PathBuf::from(dir);
            materializer.create_dir(&path)?;
            created_dirs.push(path);
        }

        for (ecosystem, fragment) in manifest_fragments(&plan.dependencies)? {
            let path = PathBuf::from(manifest_file_name(&ecosystem));
            materializer.write_file(&path, &fragment)?;
            written_files.push(path);
        }

        Ok(ScaffoldSummary {
            created_dirs,
            written_files,
        })
    }
}

/// Directory skeleton per project type
fn layout_dirs(project_type: &ProjectType) -> &'static [&'static str] {
    match project_type {
        ProjectType::JavaMaven | ProjectType::JavaGradle | ProjectType::SpringBoot => {
            &["src/main/java", "src/main/resources", "src/test/java"]
        }
        ProjectType::Python | ProjectType::Django | ProjectType::Flask => &["src", "tests"],
        ProjectType::NodeJs | ProjectType::React | ProjectType::VueJs | ProjectType::Angular => {
            &["src", "tests", "public"]
        }
        ProjectType::Custom(_) => &["src"],
    }
}

/// Render one manifest fragment per ecosystem present in the selection,
/// records in plan order
pub fn manifest_fragments(
    records: &[DependencyRecord],
) -> Result<Vec<(Ecosystem, String)>> {
    // BTreeMap keyed by label keeps fragment order deterministic
    let mut grouped: BTreeMap<String, (Ecosystem, Vec<String>)> = BTreeMap::new();
    for record in records {
        let rendered = record
            .formatted()
            .with_context(|| format!("Failed to render dependency '{}'", record.name))?;
        grouped
            .entry(record.ecosystem.label().to_string())
            .or_insert_with(|| (record.ecosystem.clone(), Vec::new()))
            .1
            .push(rendered);
    }

    Ok(grouped
        .into_values()
        .map(|(ecosystem, lines)| {
            let mut fragment = lines.join("\n");
            fragment.push('\n');
            (ecosystem, fragment)
        })
        .collect())
}

/// File the rendered fragment lands in, per ecosystem convention
pub fn manifest_file_name(ecosystem: &Ecosystem) -> &'static str {
    match ecosystem {
        Ecosystem::Maven => "dependencies.xml",
        Ecosystem::Gradle => "dependencies.gradle",
        Ecosystem::Npm | Ecosystem::Yarn => "dependencies.json",
        Ecosystem::Pip => "requirements.txt",
        Ecosystem::NuGet => "packages.props",
        Ecosystem::Composer => "composer-deps.json",
        Ecosystem::Gem => "Gemfile.deps",
        Ecosystem::GoModules => "go-deps.txt",
        Ecosystem::Other(_) => "dependencies.txt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{EnvironmentInfo, ToolProber, ToolSpec};

    struct AllAvailableProber;
    impl ToolProber for AllAvailableProber {
        fn probe(&self, spec: &ToolSpec) -> EnvironmentInfo {
            EnvironmentInfo::detected(spec.name, Some("1.0.0".to_string()), None)
        }
    }

    struct NothingAvailableProber;
    impl ToolProber for NothingAvailableProber {
        fn probe(&self, spec: &ToolSpec) -> EnvironmentInfo {
            EnvironmentInfo::unavailable(spec.name)
        }
    }

    #[derive(Default)]
    struct RecordingMaterializer {
        dirs: Vec<PathBuf>,
        files: Vec<(PathBuf, String)>,
    }

    impl TreeMaterializer for RecordingMaterializer {
        fn create_dir(&mut self, path: &Path) -> Result<()> {
            self.dirs.push(path.to_path_buf());
            Ok(())
        }

        fn write_file(&mut self, path: &Path, contents: &str) -> Result<()> {
            self.files.push((path.to_path_buf(), contents.to_string()));
            Ok(())
        }
    }

    fn orchestrator(all_available: bool) -> ScaffoldOrchestrator {
        let prober: Box<dyn ToolProber + Send + Sync> = if all_available {
            Box::new(AllAvailableProber)
        } else {
            Box::new(NothingAvailableProber)
        };
        ScaffoldOrchestrator::new(
            PresetCatalog::builtin(),
            EnvironmentRegistry::with_prober(prober),
        )
    }

    #[test]
    fn test_preflight_ready_plan() {
        let report = orchestrator(true).preflight(&ScaffoldPlan::example());
        assert!(report.ready);
        assert!(report.missing_tools.is_empty());
        assert!(report.blocking().is_empty());
    }

    #[test]
    fn test_preflight_missing_tools_block() {
        let report = orchestrator(false).preflight(&ScaffoldPlan::example());
        assert!(!report.ready);
        assert_eq!(report.missing_tools, vec!["Java", "Maven"]);
    }

    #[test]
    fn test_preflight_tools_policy_downgrade() {
        let mut plan = ScaffoldPlan::example();
        plan.policies.require_tools = false;
        let report = orchestrator(false).preflight(&plan);
        // Missing tools are reported but do not block
        assert!(report.ready);
        assert_eq!(report.missing_tools, vec!["Java", "Maven"]);
        assert!(report
            .findings
            .iter()
            .any(|f| f.category == "environment" && f.severity == CheckSeverity::Warning));
    }

    #[test]
    fn test_preflight_conflicts_block() {
        let mut plan = ScaffoldPlan::example();
        plan.project.project_type = "Flask".to_string();
        plan.dependencies = vec![
            DependencyRecord::new(Ecosystem::Pip, "django", "4.2.5"),
            DependencyRecord::new(Ecosystem::Pip, "flask", "2.3.3"),
        ];
        let report = orchestrator(true).preflight(&plan);
        assert!(!report.ready);
        assert!(report
            .blocking()
            .iter()
            .any(|f| f.message.contains("incompatible")));
    }

    #[test]
    fn test_scaffold_refuses_unready_plan() {
        let mut recorder = RecordingMaterializer::default();
        let err = orchestrator(false)
            .scaffold(&ScaffoldPlan::example(), &mut recorder)
            .unwrap_err();
        assert!(err.to_string().contains("not ready"));
        assert!(recorder.dirs.is_empty());
        assert!(recorder.files.is_empty());
    }

    #[test]
    fn test_scaffold_materializes_layout_and_manifests() {
        let mut recorder = RecordingMaterializer::default();
        let summary = orchestrator(true)
            .scaffold(&ScaffoldPlan::example(), &mut recorder)
            .unwrap();

        assert_eq!(
            summary.created_dirs,
            vec![
                PathBuf::from("src/main/java"),
                PathBuf::from("src/main/resources"),
                PathBuf::from("src/test/java"),
            ]
        );
        assert_eq!(summary.written_files, vec![PathBuf::from("dependencies.xml")]);

        let (_, fragment) = &recorder.files[0];
        assert!(fragment.contains("<artifactId>junit-jupiter</artifactId>"));
        assert!(fragment.contains("<artifactId>logback-classic</artifactId>"));
    }

    #[test]
    fn test_python_plan_writes_requirements() {
        let mut plan = ScaffoldPlan::example();
        plan.project.project_type = "Python".to_string();
        plan.dependencies = vec![
            DependencyRecord::new(Ecosystem::Pip, "requests", "2.31.0"),
            DependencyRecord::new(Ecosystem::Pip, "pytest", "7.4.2"),
        ];

        let mut recorder = RecordingMaterializer::default();
        let summary = orchestrator(true).scaffold(&plan, &mut recorder).unwrap();
        assert_eq!(summary.written_files, vec![PathBuf::from("requirements.txt")]);
        let (_, fragment) = &recorder.files[0];
        assert_eq!(fragment, "requests==2.31.0\npytest==7.4.2\n");
    }
}
