//! Plan file loading and validation

use std::fs;
use tempfile::TempDir;

use prefab::plan::{ScaffoldPlan, PLAN_FILE};
use prefab::ProjectType;

fn write_plan(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(PLAN_FILE);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_full_plan() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(
        &dir,
        r#"
[project]
name = "storefront"
type = "Spring Boot"

[[dependency]]
ecosystem = "maven"
name = "org.springframework.boot:spring-boot-starter-web"
version = "3.1.4"

[[dependency]]
ecosystem = "maven"
name = "com.h2database:h2"
version = "2.2.224"
scope = "runtime"

[policies]
strict_versions = true
require_tools = false
"#,
    );

    let plan = ScaffoldPlan::load_from(&path).unwrap();
    assert_eq!(plan.project.name, "storefront");
    assert_eq!(plan.project_type(), ProjectType::SpringBoot);
    assert_eq!(plan.dependencies.len(), 2);
    assert!(plan.policies.strict_versions);
    assert!(!plan.policies.require_tools);
}

#[test]
fn test_load_missing_file_fails_with_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");
    let err = ScaffoldPlan::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn test_load_malformed_toml_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(&dir, "[project\nname = broken");
    let err = ScaffoldPlan::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[test]
fn test_load_rejects_empty_project_name() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(
        &dir,
        r#"
[project]
name = ""
type = "Python"
"#,
    );
    assert!(ScaffoldPlan::load_from(&path).is_err());
}

#[test]
fn test_load_if_exists() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join(PLAN_FILE);
    assert!(ScaffoldPlan::load_if_exists(&missing).unwrap().is_none());

    let path = write_plan(
        &dir,
        r#"
[project]
name = "demo"
type = "Python"
"#,
    );
    assert!(ScaffoldPlan::load_if_exists(&path).unwrap().is_some());
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(PLAN_FILE);

    let plan = ScaffoldPlan::example();
    plan.save(&path).unwrap();

    let reloaded = ScaffoldPlan::load_from(&path).unwrap();
    assert_eq!(reloaded.project.name, plan.project.name);
    assert_eq!(reloaded.dependencies, plan.dependencies);
}

#[test]
fn test_unknown_project_type_parses_to_custom() {
    let dir = TempDir::new().unwrap();
    let path = write_plan(
        &dir,
        r#"
[project]
name = "firmware"
type = "Embedded C"
"#,
    );
    let plan = ScaffoldPlan::load_from(&path).unwrap();
    assert_eq!(
        plan.project_type(),
        ProjectType::Custom("Embedded C".to_string())
    );
}
