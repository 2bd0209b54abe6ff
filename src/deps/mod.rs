//! Dependency records and per-ecosystem manifest rendering.
//!
//! A [`DependencyRecord`] describes one selected dependency. Rendering
//! dispatches on the ecosystem tag and reproduces each package manager's
//! manifest syntax verbatim so the generated fragment is accepted by the
//! ecosystem's tooling.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Sentinel version used when no version was specified
pub const LATEST_VERSION: &str = "latest";

/// Fallback Maven group when a name carries no discernible grouping
const FALLBACK_GROUP_ID: &str = "org.example";

/// A package-manager domain with its own manifest syntax
#[derive(Debug, Clone, Eq)]
pub enum Ecosystem {
    Maven,
    Gradle,
    Npm,
    Yarn,
    Pip,
    NuGet,
    Composer,
    Gem,
    GoModules,
    /// Unrecognized tag, kept verbatim (lowercased) for generic rendering
    Other(String),
}

impl Ecosystem {
    /// Parse an ecosystem tag, case-insensitively
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "maven" => Ecosystem::Maven,
            "gradle" => Ecosystem::Gradle,
            "npm" => Ecosystem::Npm,
            "yarn" => Ecosystem::Yarn,
            "pip" => Ecosystem::Pip,
            "nuget" => Ecosystem::NuGet,
            "composer" => Ecosystem::Composer,
            "gem" => Ecosystem::Gem,
            "go modules" | "go" => Ecosystem::GoModules,
            other => Ecosystem::Other(other.to_string()),
        }
    }

    /// Canonical label for display and serialization
    pub fn label(&self) -> &str {
        match self {
            Ecosystem::Maven => "maven",
            Ecosystem::Gradle => "gradle",
            Ecosystem::Npm => "npm",
            Ecosystem::Yarn => "yarn",
            Ecosystem::Pip => "pip",
            Ecosystem::NuGet => "nuget",
            Ecosystem::Composer => "composer",
            Ecosystem::Gem => "gem",
            Ecosystem::GoModules => "go modules",
            Ecosystem::Other(tag) => tag,
        }
    }
}

impl PartialEq for Ecosystem {
    fn eq(&self, other: &Self) -> bool {
        self.label() == other.label()
    }
}

impl Hash for Ecosystem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label().hash(state);
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Ecosystem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Ecosystem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag.trim().is_empty() {
            return Err(D::Error::custom("ecosystem tag must not be empty"));
        }
        Ok(Ecosystem::parse(&tag))
    }
}

/// Dependency scope within the consuming project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
}

impl DependencyScope {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "test" => DependencyScope::Test,
            "runtime" => DependencyScope::Runtime,
            "provided" => DependencyScope::Provided,
            _ => DependencyScope::Compile,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyScope::Compile => "compile",
            DependencyScope::Test => "test",
            DependencyScope::Runtime => "runtime",
            DependencyScope::Provided => "provided",
        }
    }
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for DependencyScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DependencyScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(DependencyScope::parse(&s))
    }
}

/// Caller-contract violations in dependency handling
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DependencyError {
    #[error("dependency name must not be empty")]
    EmptyName,
    #[error("ecosystem tag must not be empty")]
    EmptyEcosystem,
}

/// One selected dependency: ecosystem, coordinates and rendering metadata.
///
/// Identity is the triple (ecosystem, name, version); description, scope and
/// the optional flag do not participate in equality.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub ecosystem: Ecosystem,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub scope: DependencyScope,
}

fn default_version() -> String {
    LATEST_VERSION.to_string()
}

impl PartialEq for DependencyRecord {
    fn eq(&self, other: &Self) -> bool {
        self.ecosystem == other.ecosystem
            && self.name == other.name
            && self.version == other.version
    }
}

impl Hash for DependencyRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ecosystem.hash(state);
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.ecosystem, self.name, self.version)
    }
}

impl DependencyRecord {
    /// Create a record; an empty version becomes the `"latest"` sentinel
    pub fn new(ecosystem: Ecosystem, name: &str, version: &str) -> Self {
        let version = if version.trim().is_empty() {
            LATEST_VERSION.to_string()
        } else {
            version.trim().to_string()
        };
        Self {
            ecosystem,
            name: name.trim().to_string(),
            version,
            description: String::new(),
            optional: false,
            scope: DependencyScope::Compile,
        }
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// A record is valid when its name and ecosystem tag are non-empty
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.ecosystem.label().trim().is_empty()
    }

    /// Fully-qualified identity string, e.g. `maven:org.junit.jupiter:junit-jupiter:5.10.0`
    pub fn full_name(&self) -> String {
        format!("{}:{}:{}", self.ecosystem, self.name, self.version)
    }

    /// Render this dependency in the manifest syntax of its ecosystem.
    ///
    /// Empty identifiers indicate a caller bug and fail loudly; every
    /// recognized ecosystem renders a fixed template and unrecognized tags
    /// fall back to a generic `name version` line.
    pub fn formatted(&self) -> Result<String, DependencyError> {
        if self.name.trim().is_empty() {
            return Err(DependencyError::EmptyName);
        }
        if self.ecosystem.label().trim().is_empty() {
            return Err(DependencyError::EmptyEcosystem);
        }

        let rendered = match &self.ecosystem {
            Ecosystem::Maven => self.format_maven(),
            Ecosystem::Gradle => self.format_gradle(),
            Ecosystem::Npm | Ecosystem::Yarn => format!("\"{}\": \"{}\"", self.name, self.version),
            Ecosystem::Pip => format!("{}=={}", self.name, self.version),
            Ecosystem::NuGet => format!(
                "<PackageReference Include=\"{}\" Version=\"{}\" />",
                self.name, self.version
            ),
            Ecosystem::Composer => format!("\"{}\": \"{}\"", self.name, self.version),
            Ecosystem::Gem => format!("gem '{}', '{}'", self.name, self.version),
            Ecosystem::GoModules => format!("{} {}", self.name, self.version),
            Ecosystem::Other(_) => format!("{} {}", self.name, self.version),
        };

        Ok(rendered)
    }

    fn format_maven(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<dependency>\n");
        xml.push_str(&format!("    <groupId>{}</groupId>\n", self.group_id()));
        xml.push_str(&format!(
            "    <artifactId>{}</artifactId>\n",
            self.artifact_id()
        ));
        xml.push_str(&format!("    <version>{}</version>\n", self.version));
        if self.scope != DependencyScope::Compile {
            xml.push_str(&format!("    <scope>{}</scope>\n", self.scope));
        }
        if self.optional {
            xml.push_str("    <optional>true</optional>\n");
        }
        xml.push_str("</dependency>");
        xml
    }

    fn format_gradle(&self) -> String {
        let configuration = if self.scope == DependencyScope::Test {
            "testImplementation"
        } else {
            "implementation"
        };
        format!("{} '{}:{}'", configuration, self.name, self.version)
    }

    /// Group identifier for coordinate-split ecosystems.
    ///
    /// `group:artifact` names split on the colon; reverse-domain names keep
    /// everything up to the last dot; anything else gets the fallback group.
    pub fn group_id(&self) -> String {
        if let Some((group, _)) = self.name.split_once(':') {
            return group.to_string();
        }
        if self.name.starts_with("org.")
            || self.name.starts_with("com.")
            || self.name.starts_with("io.")
        {
            if let Some(last_dot) = self.name.rfind('.') {
                if last_dot > 0 {
                    return self.name[..last_dot].to_string();
                }
            }
        }
        FALLBACK_GROUP_ID.to_string()
    }

    /// Artifact identifier: the part after the colon, or after the last dot
    pub fn artifact_id(&self) -> String {
        if let Some((_, artifact)) = self.name.split_once(':') {
            if !artifact.is_empty() {
                return artifact.to_string();
            }
            return self.name.trim_end_matches(':').to_string();
        }
        match self.name.rfind('.') {
            Some(last_dot) if last_dot > 0 => self.name[last_dot + 1..].to_string(),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecosystem_parse_case_insensitive() {
        assert_eq!(Ecosystem::parse("Maven"), Ecosystem::Maven);
        assert_eq!(Ecosystem::parse("NPM"), Ecosystem::Npm);
        assert_eq!(Ecosystem::parse("Go Modules"), Ecosystem::GoModules);
        assert_eq!(
            Ecosystem::parse("Cargo"),
            Ecosystem::Other("cargo".to_string())
        );
    }

    #[test]
    fn test_default_version_is_latest() {
        let record = DependencyRecord::new(Ecosystem::Npm, "express", "");
        assert_eq!(record.version, LATEST_VERSION);
    }

    #[test]
    fn test_identity_is_ecosystem_name_version() {
        let a = DependencyRecord::new(Ecosystem::Maven, "com.h2database:h2", "2.2.224")
            .with_scope(DependencyScope::Test);
        let b = DependencyRecord::new(Ecosystem::Maven, "com.h2database:h2", "2.2.224")
            .with_description("In-memory database");
        let c = DependencyRecord::new(Ecosystem::Maven, "com.h2database:h2", "2.3.0");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_maven_format_basic() {
        let record =
            DependencyRecord::new(Ecosystem::Maven, "org.junit.jupiter:junit-jupiter", "5.10.0");
        let expected = "<dependency>\n    <groupId>org.junit.jupiter</groupId>\n    <artifactId>junit-jupiter</artifactId>\n    <version>5.10.0</version>\n</dependency>";
        assert_eq!(record.formatted().unwrap(), expected);
    }

    #[test]
    fn test_maven_format_with_scope_and_optional() {
        let record =
            DependencyRecord::new(Ecosystem::Maven, "org.junit.jupiter:junit-jupiter", "5.10.0")
                .with_scope(DependencyScope::Test)
                .with_optional(true);
        let out = record.formatted().unwrap();
        assert!(out.contains("    <scope>test</scope>\n"));
        assert!(out.contains("    <optional>true</optional>\n"));
    }

    #[test]
    fn test_gradle_format_scope_dispatch() {
        let compile = DependencyRecord::new(Ecosystem::Gradle, "com.google.code.gson:gson", "2.10.1");
        assert_eq!(
            compile.formatted().unwrap(),
            "implementation 'com.google.code.gson:gson:2.10.1'"
        );

        let test = compile.clone().with_scope(DependencyScope::Test);
        assert_eq!(
            test.formatted().unwrap(),
            "testImplementation 'com.google.code.gson:gson:2.10.1'"
        );
    }

    #[test]
    fn test_npm_and_composer_format() {
        let npm = DependencyRecord::new(Ecosystem::Npm, "express", "4.18.2");
        assert_eq!(npm.formatted().unwrap(), "\"express\": \"4.18.2\"");

        let composer = DependencyRecord::new(Ecosystem::Composer, "monolog/monolog", "3.5.0");
        assert_eq!(
            composer.formatted().unwrap(),
            "\"monolog/monolog\": \"3.5.0\""
        );
    }

    #[test]
    fn test_pip_nuget_gem_go_formats() {
        let pip = DependencyRecord::new(Ecosystem::Pip, "requests", "2.31.0");
        assert_eq!(pip.formatted().unwrap(), "requests==2.31.0");

        let nuget = DependencyRecord::new(Ecosystem::NuGet, "Newtonsoft.Json", "13.0.3");
        assert_eq!(
            nuget.formatted().unwrap(),
            "<PackageReference Include=\"Newtonsoft.Json\" Version=\"13.0.3\" />"
        );

        let gem = DependencyRecord::new(Ecosystem::Gem, "rails", "7.1.2");
        assert_eq!(gem.formatted().unwrap(), "gem 'rails', '7.1.2'");

        let gomod = DependencyRecord::new(Ecosystem::GoModules, "github.com/gin-gonic/gin", "v1.9.1");
        assert_eq!(
            gomod.formatted().unwrap(),
            "github.com/gin-gonic/gin v1.9.1"
        );
    }

    #[test]
    fn test_unrecognized_ecosystem_generic_fallback() {
        let record = DependencyRecord::new(Ecosystem::parse("conan"), "zlib", "1.3.1");
        assert_eq!(record.formatted().unwrap(), "zlib 1.3.1");
    }

    #[test]
    fn test_empty_name_fails_loudly() {
        let record = DependencyRecord::new(Ecosystem::Npm, "", "1.0.0");
        assert_eq!(record.formatted(), Err(DependencyError::EmptyName));
        assert!(!record.is_valid());
    }

    #[test]
    fn test_group_id_split() {
        let coords =
            DependencyRecord::new(Ecosystem::Maven, "org.springframework.boot:spring-boot-starter-web", "3.1.4");
        assert_eq!(coords.group_id(), "org.springframework.boot");
        assert_eq!(coords.artifact_id(), "spring-boot-starter-web");

        let dotted = DependencyRecord::new(Ecosystem::Maven, "com.fasterxml.jackson.core", "2.15.2");
        assert_eq!(dotted.group_id(), "com.fasterxml.jackson");
        assert_eq!(dotted.artifact_id(), "core");

        let bare = DependencyRecord::new(Ecosystem::Maven, "h2", "2.2.224");
        assert_eq!(bare.group_id(), "org.example");
        assert_eq!(bare.artifact_id(), "h2");
    }
}
