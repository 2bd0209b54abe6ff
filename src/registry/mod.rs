//! Latest-version lookups against public package registries.
//!
//! Supports the npm registry, PyPI and Maven Central search. Lookups are
//! best-effort network calls; callers surface failures as advisory errors,
//! never as hard stops.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::deps::Ecosystem;
use crate::utils::REGISTRY_TIMEOUT;

const NPM_REGISTRY: &str = "https://registry.npmjs.org";
const PYPI_REGISTRY: &str = "https://pypi.org/pypi";
const MAVEN_SEARCH: &str = "https://search.maven.org/solrsearch/select";

#[derive(Debug, Deserialize)]
struct NpmPackument {
    #[serde(rename = "dist-tags")]
    dist_tags: NpmDistTags,
}

#[derive(Debug, Deserialize)]
struct NpmDistTags {
    latest: String,
}

#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    version: String,
}

#[derive(Debug, Deserialize)]
struct MavenSearchResponse {
    response: MavenSearchBody,
}

#[derive(Debug, Deserialize)]
struct MavenSearchBody {
    docs: Vec<MavenDoc>,
}

#[derive(Debug, Deserialize)]
struct MavenDoc {
    #[serde(rename = "latestVersion")]
    latest_version: String,
}

/// Blocking client for registry queries
pub struct RegistryClient {
    client: reqwest::blocking::Client,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REGISTRY_TIMEOUT)
            .user_agent(concat!("prefab/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Latest published version of a package in its ecosystem's registry.
    ///
    /// Maven and Gradle packages must be named `group:artifact`. Ecosystems
    /// without a supported registry fail with a descriptive error.
    pub fn latest_version(&self, ecosystem: &Ecosystem, package: &str) -> Result<String> {
        if package.trim().is_empty() {
            bail!("package name must not be empty");
        }
        match ecosystem {
            Ecosystem::Npm | Ecosystem::Yarn => self.latest_npm(package),
            Ecosystem::Pip => self.latest_pypi(package),
            Ecosystem::Maven | Ecosystem::Gradle => self.latest_maven(package),
            other => bail!("no registry lookup supported for ecosystem '{}'", other),
        }
    }

    fn latest_npm(&self, package: &str) -> Result<String> {
        // Scoped packages keep their slash percent-encoded in the URL path
        let encoded = package.replace('/', "%2f");
        let url = format!("{}/{}", NPM_REGISTRY, encoded);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to query npm registry for '{}'", package))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            bail!("package '{}' not found in the npm registry", package);
        }
        let packument: NpmPackument = response
            .error_for_status()
            .with_context(|| format!("npm registry rejected the query for '{}'", package))?
            .json()
            .with_context(|| format!("Failed to parse npm registry response for '{}'", package))?;

        Ok(packument.dist_tags.latest)
    }

    fn latest_pypi(&self, package: &str) -> Result<String> {
        let url = format!("{}/{}/json", PYPI_REGISTRY, package);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to query PyPI for '{}'", package))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            bail!("package '{}' not found on PyPI", package);
        }
        let parsed: PypiResponse = response
            .error_for_status()
            .with_context(|| format!("PyPI rejected the query for '{}'", package))?
            .json()
            .with_context(|| format!("Failed to parse PyPI response for '{}'", package))?;

        Ok(parsed.info.version)
    }

    fn latest_maven(&self, package: &str) -> Result<String> {
        let Some((group, artifact)) = package.split_once(':') else {
            bail!(
                "maven packages must be named 'group:artifact', got '{}'",
                package
            );
        };
        let url = format!(
            "{}?q=g:{}+AND+a:{}&rows=1&wt=json",
            MAVEN_SEARCH, group, artifact
        );
        let parsed: MavenSearchResponse = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to query Maven Central for '{}'", package))?
            .error_for_status()
            .with_context(|| format!("Maven Central rejected the query for '{}'", package))?
            .json()
            .with_context(|| format!("Failed to parse Maven Central response for '{}'", package))?;

        match parsed.response.docs.first() {
            Some(doc) => Ok(doc.latest_version.clone()),
            None => bail!("package '{}' not found on Maven Central", package),
        }
    }
}
