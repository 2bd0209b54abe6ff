//! Project type profiles and the curated preset catalog.
//!
//! The catalog is a fixed, read-only table populated at construction and
//! never mutated afterwards. Preset order is declaration order, which keeps
//! generated manifests reproducible.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::deps::Ecosystem;

/// A scaffoldable project type with a fixed compatibility profile.
///
/// Unknown labels parse to `Custom`, the catch-all that accepts any
/// ecosystem and requires no host tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProjectType {
    JavaMaven,
    JavaGradle,
    SpringBoot,
    Python,
    Django,
    Flask,
    NodeJs,
    React,
    VueJs,
    Angular,
    Custom(String),
}

impl ProjectType {
    /// Parse a project-type label, case-insensitively
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "java maven" => ProjectType::JavaMaven,
            "java gradle" => ProjectType::JavaGradle,
            "spring boot" => ProjectType::SpringBoot,
            "python" => ProjectType::Python,
            "django" => ProjectType::Django,
            "flask" => ProjectType::Flask,
            "node.js" | "nodejs" => ProjectType::NodeJs,
            "react" => ProjectType::React,
            "vue.js" | "vuejs" => ProjectType::VueJs,
            "angular" => ProjectType::Angular,
            _ => ProjectType::Custom(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProjectType::JavaMaven => "Java Maven",
            ProjectType::JavaGradle => "Java Gradle",
            ProjectType::SpringBoot => "Spring Boot",
            ProjectType::Python => "Python",
            ProjectType::Django => "Django",
            ProjectType::Flask => "Flask",
            ProjectType::NodeJs => "Node.js",
            ProjectType::React => "React",
            ProjectType::VueJs => "Vue.js",
            ProjectType::Angular => "Angular",
            ProjectType::Custom(label) => label,
        }
    }

    /// Ecosystems this project type accepts; empty means "accepts any"
    pub fn accepted_ecosystems(&self) -> &'static [Ecosystem] {
        static MAVEN_ONLY: [Ecosystem; 1] = [Ecosystem::Maven];
        static GRADLE_ONLY: [Ecosystem; 1] = [Ecosystem::Gradle];
        static PIP_ONLY: [Ecosystem; 1] = [Ecosystem::Pip];
        static NODE: [Ecosystem; 2] = [Ecosystem::Npm, Ecosystem::Yarn];

        match self {
            ProjectType::JavaMaven | ProjectType::SpringBoot => &MAVEN_ONLY,
            ProjectType::JavaGradle => &GRADLE_ONLY,
            ProjectType::Python | ProjectType::Django | ProjectType::Flask => &PIP_ONLY,
            ProjectType::NodeJs | ProjectType::React | ProjectType::VueJs | ProjectType::Angular => {
                &NODE
            }
            ProjectType::Custom(_) => &[],
        }
    }

    /// Whether this project type accepts the given ecosystem.
    /// Custom projects accept any ecosystem unconditionally.
    pub fn accepts(&self, ecosystem: &Ecosystem) -> bool {
        let accepted = self.accepted_ecosystems();
        accepted.is_empty() || accepted.contains(ecosystem)
    }

    /// Host tools required to build a project of this type, in check order
    pub fn required_tools(&self) -> &'static [&'static str] {
        match self {
            ProjectType::JavaMaven | ProjectType::SpringBoot => &["Java", "Maven"],
            ProjectType::JavaGradle => &["Java", "Gradle"],
            ProjectType::Python | ProjectType::Django | ProjectType::Flask => &["Python", "Pip"],
            ProjectType::NodeJs | ProjectType::React | ProjectType::VueJs | ProjectType::Angular => {
                &["Node.js", "NPM"]
            }
            ProjectType::Custom(_) => &[],
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A curated dependency suggestion for a project type
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub display_name: &'static str,
    pub description: &'static str,
    pub ecosystem: Ecosystem,
    pub artifact: &'static str,
    pub default_version: &'static str,
    pub required: bool,
    pub compatible_versions: &'static [&'static str],
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.required { "Required" } else { "Optional" };
        write!(f, "{} ({})", self.display_name, tag)
    }
}

/// A declared mutually-exclusive dependency pair within one ecosystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub ecosystem: Ecosystem,
    pub first: String,
    pub second: String,
}

impl ExclusionRule {
    pub fn new(ecosystem: Ecosystem, first: &str, second: &str) -> Self {
        Self {
            ecosystem,
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Symmetric match on a pair of dependency names within this ecosystem
    pub fn matches(&self, ecosystem: &Ecosystem, a: &str, b: &str) -> bool {
        *ecosystem == self.ecosystem
            && ((a == self.first && b == self.second) || (a == self.second && b == self.first))
    }
}

struct PresetGroup {
    project_type: ProjectType,
    presets: Vec<Preset>,
}

/// The read-only preset registry, populated once at construction
pub struct PresetCatalog {
    groups: Vec<PresetGroup>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    /// Build the catalog from the built-in curated table
    pub fn builtin() -> Self {
        let groups = vec![
            PresetGroup {
                project_type: ProjectType::JavaMaven,
                presets: vec![
                    preset("JUnit 5", "Modern testing framework", Ecosystem::Maven,
                        "org.junit.jupiter:junit-jupiter", "5.10.0", false,
                        &["5.9.0", "5.10.0", "5.11.0"]),
                    preset("Spring Boot Starter", "Spring Boot web starter", Ecosystem::Maven,
                        "org.springframework.boot:spring-boot-starter-web", "3.1.4", false,
                        &["3.0.0", "3.1.4", "3.2.0"]),
                    preset("Jackson Core", "JSON processing library", Ecosystem::Maven,
                        "com.fasterxml.jackson.core:jackson-databind", "2.15.2", false,
                        &["2.14.0", "2.15.2", "2.16.0"]),
                    preset("Logback", "Logging framework", Ecosystem::Maven,
                        "ch.qos.logback:logback-classic", "1.4.11", false,
                        &["1.4.8", "1.4.11", "1.5.0"]),
                    preset("Apache Commons Lang", "Common utilities", Ecosystem::Maven,
                        "org.apache.commons:commons-lang3", "3.13.0", false,
                        &["3.12.0", "3.13.0", "3.14.0"]),
                ],
            },
            PresetGroup {
                project_type: ProjectType::JavaGradle,
                presets: vec![
                    preset("JUnit 5", "Modern testing framework", Ecosystem::Gradle,
                        "org.junit.jupiter:junit-jupiter", "5.10.0", false,
                        &["5.9.0", "5.10.0", "5.11.0"]),
                    preset("Spring Boot Starter", "Spring Boot web starter", Ecosystem::Gradle,
                        "org.springframework.boot:spring-boot-starter-web", "3.1.4", false,
                        &["3.0.0", "3.1.4", "3.2.0"]),
                    preset("Gson", "Google JSON library", Ecosystem::Gradle,
                        "com.google.code.gson:gson", "2.10.1", false,
                        &["2.9.0", "2.10.1", "2.11.0"]),
                ],
            },
            PresetGroup {
                project_type: ProjectType::SpringBoot,
                presets: vec![
                    preset("Spring Boot Starter Web", "Web development starter", Ecosystem::Maven,
                        "org.springframework.boot:spring-boot-starter-web", "3.1.4", true,
                        &["3.0.0", "3.1.4", "3.2.0"]),
                    preset("Spring Boot Starter Data JPA", "JPA data access", Ecosystem::Maven,
                        "org.springframework.boot:spring-boot-starter-data-jpa", "3.1.4", false,
                        &["3.0.0", "3.1.4", "3.2.0"]),
                    preset("Spring Boot Starter Security", "Security framework", Ecosystem::Maven,
                        "org.springframework.boot:spring-boot-starter-security", "3.1.4", false,
                        &["3.0.0", "3.1.4", "3.2.0"]),
                    preset("Spring Boot DevTools", "Development tools", Ecosystem::Maven,
                        "org.springframework.boot:spring-boot-devtools", "3.1.4", false,
                        &["3.0.0", "3.1.4", "3.2.0"]),
                    preset("H2 Database", "In-memory database", Ecosystem::Maven,
                        "com.h2database:h2", "2.2.224", false,
                        &["2.1.214", "2.2.224", "2.3.0"]),
                    preset("MySQL Connector", "MySQL database driver", Ecosystem::Maven,
                        "mysql:mysql-connector-java", "8.0.33", false,
                        &["8.0.30", "8.0.33", "9.0.0"]),
                ],
            },
            PresetGroup {
                project_type: ProjectType::Python,
                presets: vec![
                    preset("Requests", "HTTP library", Ecosystem::Pip,
                        "requests", "2.31.0", false, &["2.28.0", "2.31.0", "2.32.0"]),
                    preset("NumPy", "Numerical computing", Ecosystem::Pip,
                        "numpy", "1.24.3", false, &["1.21.0", "1.24.3", "1.26.0"]),
                    preset("Pandas", "Data manipulation", Ecosystem::Pip,
                        "pandas", "2.0.3", false, &["1.5.0", "2.0.3", "2.1.0"]),
                    preset("Flask", "Web framework", Ecosystem::Pip,
                        "flask", "2.3.3", false, &["2.2.0", "2.3.3", "3.0.0"]),
                    preset("Django", "Full-featured web framework", Ecosystem::Pip,
                        "django", "4.2.5", false, &["4.1.0", "4.2.5", "5.0.0"]),
                    preset("PyTest", "Testing framework", Ecosystem::Pip,
                        "pytest", "7.4.2", false, &["7.1.0", "7.4.2", "8.0.0"]),
                ],
            },
            PresetGroup {
                project_type: ProjectType::NodeJs,
                presets: vec![
                    preset("Express", "Web framework", Ecosystem::Npm,
                        "express", "4.18.2", false, &["4.17.0", "4.18.2", "5.0.0"]),
                    preset("Lodash", "Utility library", Ecosystem::Npm,
                        "lodash", "4.17.21", false, &["4.17.20", "4.17.21", "5.0.0"]),
                    preset("Axios", "HTTP client", Ecosystem::Npm,
                        "axios", "1.5.0", false, &["1.3.0", "1.5.0", "2.0.0"]),
                    preset("Moment", "Date manipulation", Ecosystem::Npm,
                        "moment", "2.29.4", false, &["2.29.0", "2.29.4", "3.0.0"]),
                    preset("Jest", "Testing framework", Ecosystem::Npm,
                        "jest", "29.7.0", false, &["29.5.0", "29.7.0", "30.0.0"]),
                ],
            },
            PresetGroup {
                project_type: ProjectType::React,
                presets: vec![
                    preset("React", "React library", Ecosystem::Npm,
                        "react", "18.2.0", true, &["18.0.0", "18.2.0", "19.0.0"]),
                    preset("React DOM", "React DOM renderer", Ecosystem::Npm,
                        "react-dom", "18.2.0", true, &["18.0.0", "18.2.0", "19.0.0"]),
                    preset("React Router", "Client-side routing", Ecosystem::Npm,
                        "react-router-dom", "6.15.0", false, &["6.8.0", "6.15.0", "7.0.0"]),
                    preset("Styled Components", "CSS-in-JS styling", Ecosystem::Npm,
                        "styled-components", "6.0.7", false, &["5.3.0", "6.0.7", "7.0.0"]),
                    preset("Material-UI", "React UI framework", Ecosystem::Npm,
                        "@mui/material", "5.14.5", false, &["5.10.0", "5.14.5", "6.0.0"]),
                    preset("React Testing Library", "Testing utilities", Ecosystem::Npm,
                        "@testing-library/react", "13.4.0", false, &["13.0.0", "13.4.0", "14.0.0"]),
                ],
            },
            PresetGroup {
                project_type: ProjectType::Django,
                presets: vec![
                    preset("Django", "Django framework", Ecosystem::Pip,
                        "django", "4.2.5", true, &["4.1.0", "4.2.5", "5.0.0"]),
                    preset("Django REST Framework", "API framework", Ecosystem::Pip,
                        "djangorestframework", "3.14.0", false, &["3.12.0", "3.14.0", "4.0.0"]),
                    preset("Django CORS Headers", "CORS handling", Ecosystem::Pip,
                        "django-cors-headers", "4.3.0", false, &["4.0.0", "4.3.0", "5.0.0"]),
                    preset("Pillow", "Image processing", Ecosystem::Pip,
                        "pillow", "10.0.0", false, &["9.5.0", "10.0.0", "11.0.0"]),
                    preset("psycopg2", "PostgreSQL adapter", Ecosystem::Pip,
                        "psycopg2-binary", "2.9.7", false, &["2.9.5", "2.9.7", "3.0.0"]),
                ],
            },
            PresetGroup {
                project_type: ProjectType::Flask,
                presets: vec![
                    preset("Flask", "Flask framework", Ecosystem::Pip,
                        "flask", "2.3.3", true, &["2.2.0", "2.3.3", "3.0.0"]),
                    preset("Flask-SQLAlchemy", "SQLAlchemy integration", Ecosystem::Pip,
                        "flask-sqlalchemy", "3.0.5", false, &["3.0.0", "3.0.5", "4.0.0"]),
                    preset("Flask-Login", "User session management", Ecosystem::Pip,
                        "flask-login", "0.6.2", false, &["0.6.0", "0.6.2", "0.7.0"]),
                    preset("Flask-WTF", "Form handling", Ecosystem::Pip,
                        "flask-wtf", "1.1.1", false, &["1.0.0", "1.1.1", "2.0.0"]),
                ],
            },
        ];

        Self { groups }
    }

    /// Presets curated for a project type, in declaration order.
    ///
    /// Only presets whose ecosystem the type's profile accepts are returned.
    /// Unknown and custom project types yield an empty list, never an error.
    pub fn presets_for_project_type(&self, project_type: &ProjectType) -> Vec<&Preset> {
        self.groups
            .iter()
            .find(|g| g.project_type == *project_type)
            .map(|g| {
                g.presets
                    .iter()
                    .filter(|p| project_type.accepts(&p.ecosystem))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Default version of the exactly-named preset, or the `"latest"` sentinel.
    ///
    /// Absence is not an error: dependencies outside the catalog are allowed.
    pub fn recommended_version(&self, project_type: &ProjectType, display_name: &str) -> String {
        self.presets_for_project_type(project_type)
            .iter()
            .find(|p| p.display_name == display_name)
            .map(|p| p.default_version.to_string())
            .unwrap_or_else(|| crate::deps::LATEST_VERSION.to_string())
    }

    /// Look up a preset by display name within a project type's filtered set
    pub fn find_preset(&self, project_type: &ProjectType, display_name: &str) -> Option<&Preset> {
        self.presets_for_project_type(project_type)
            .into_iter()
            .find(|p| p.display_name == display_name)
    }
}

fn preset(
    display_name: &'static str,
    description: &'static str,
    ecosystem: Ecosystem,
    artifact: &'static str,
    default_version: &'static str,
    required: bool,
    compatible_versions: &'static [&'static str],
) -> Preset {
    Preset {
        display_name,
        description,
        ecosystem,
        artifact,
        default_version,
        required,
        compatible_versions,
    }
}

/// Built-in mutually-exclusive dependency pairs.
///
/// Which names are exclusive is domain data, not algorithm: these defaults
/// cover the common same-slot collisions, and plans can declare additional
/// pairs via `[compat] extra_exclusions`.
pub fn default_exclusions() -> Vec<ExclusionRule> {
    vec![
        ExclusionRule::new(Ecosystem::Pip, "django", "flask"),
        ExclusionRule::new(Ecosystem::Npm, "react", "vue"),
        ExclusionRule::new(Ecosystem::Npm, "react", "@angular/core"),
        ExclusionRule::new(Ecosystem::Npm, "vue", "@angular/core"),
        ExclusionRule::new(Ecosystem::Npm, "express", "fastify"),
        ExclusionRule::new(
            Ecosystem::Maven,
            "org.springframework.boot:spring-boot-starter-web",
            "org.springframework.boot:spring-boot-starter-webflux",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project_type_case_insensitive() {
        assert_eq!(ProjectType::parse("java maven"), ProjectType::JavaMaven);
        assert_eq!(ProjectType::parse("NODE.JS"), ProjectType::NodeJs);
        assert_eq!(
            ProjectType::parse("Kotlin Multiplatform"),
            ProjectType::Custom("Kotlin Multiplatform".to_string())
        );
    }

    #[test]
    fn test_presets_match_profile() {
        let catalog = PresetCatalog::builtin();

        for project_type in [
            ProjectType::JavaMaven,
            ProjectType::JavaGradle,
            ProjectType::SpringBoot,
            ProjectType::Python,
            ProjectType::NodeJs,
            ProjectType::React,
            ProjectType::Django,
            ProjectType::Flask,
        ] {
            let presets = catalog.presets_for_project_type(&project_type);
            assert!(!presets.is_empty(), "{} has presets", project_type);
            for p in presets {
                assert!(
                    project_type.accepts(&p.ecosystem),
                    "{} preset {} must match profile",
                    project_type,
                    p.display_name
                );
            }
        }
    }

    #[test]
    fn test_preset_order_is_stable() {
        let catalog = PresetCatalog::builtin();
        let names: Vec<&str> = catalog
            .presets_for_project_type(&ProjectType::JavaMaven)
            .iter()
            .map(|p| p.display_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "JUnit 5",
                "Spring Boot Starter",
                "Jackson Core",
                "Logback",
                "Apache Commons Lang"
            ]
        );
    }

    #[test]
    fn test_unknown_project_type_yields_empty() {
        let catalog = PresetCatalog::builtin();
        let presets = catalog.presets_for_project_type(&ProjectType::parse("Zig"));
        assert!(presets.is_empty());
    }

    #[test]
    fn test_recommended_version_fallback() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(
            catalog.recommended_version(&ProjectType::JavaMaven, "JUnit 5"),
            "5.10.0"
        );
        assert_eq!(
            catalog.recommended_version(&ProjectType::JavaMaven, "NonExistentLib"),
            "latest"
        );
    }

    #[test]
    fn test_custom_accepts_any_ecosystem() {
        let custom = ProjectType::parse("Custom");
        assert!(custom.accepts(&Ecosystem::Maven));
        assert!(custom.accepts(&Ecosystem::Npm));
        assert!(custom.accepts(&Ecosystem::parse("conan")));
        assert!(custom.required_tools().is_empty());
    }

    #[test]
    fn test_profile_required_tools() {
        assert_eq!(ProjectType::JavaMaven.required_tools(), &["Java", "Maven"]);
        assert_eq!(ProjectType::Python.required_tools(), &["Python", "Pip"]);
        assert_eq!(ProjectType::React.required_tools(), &["Node.js", "NPM"]);
    }

    #[test]
    fn test_exclusion_rule_is_symmetric() {
        let rule = ExclusionRule::new(Ecosystem::Pip, "django", "flask");
        assert!(rule.matches(&Ecosystem::Pip, "django", "flask"));
        assert!(rule.matches(&Ecosystem::Pip, "flask", "django"));
        assert!(!rule.matches(&Ecosystem::Npm, "django", "flask"));
        assert!(!rule.matches(&Ecosystem::Pip, "django", "requests"));
    }
}
