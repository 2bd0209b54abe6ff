//! Host environment probing with a process-lifetime cache.
//!
//! Each known tool is probed once by spawning its version command with a
//! timeout and scraping a version token from the output. Results live in an
//! in-memory cache until `clear_cache` is called, so repeated checks stay
//! cheap.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::catalog::ProjectType;
use crate::utils::{extract_version_token, run_command_with_timeout, CommandResult, PROBE_TIMEOUT};

/// Probe outcome for one tool.
///
/// When `available` is false, `version` and `install_path` are always None.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub tool: String,
    pub version: Option<String>,
    pub install_path: Option<PathBuf>,
    pub available: bool,
}

impl EnvironmentInfo {
    pub fn detected(tool: &str, version: Option<String>, install_path: Option<PathBuf>) -> Self {
        Self {
            tool: tool.to_string(),
            version,
            install_path,
            available: true,
        }
    }

    pub fn unavailable(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
            version: None,
            install_path: None,
            available: false,
        }
    }
}

impl fmt::Display for EnvironmentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.available {
            let version = self.version.as_deref().unwrap_or("unknown version");
            write!(f, "{}: {}", self.tool, version)?;
            if let Some(path) = &self.install_path {
                write!(f, " ({})", path.display())?;
            }
            Ok(())
        } else {
            write!(f, "{}: not available", self.tool)
        }
    }
}

/// How to probe one tool: candidate binaries (tried in order) and the
/// argument that makes each print its version
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub name: &'static str,
    pub binaries: &'static [&'static str],
    pub version_args: &'static [&'static str],
}

/// Tools the probe knows about, in display order
pub const PROBED_TOOLS: &[ToolSpec] = &[
    ToolSpec { name: "Java", binaries: &["java"], version_args: &["-version"] },
    ToolSpec { name: "Maven", binaries: &["mvn"], version_args: &["--version"] },
    ToolSpec { name: "Gradle", binaries: &["gradle"], version_args: &["--version"] },
    ToolSpec { name: "Node.js", binaries: &["node"], version_args: &["--version"] },
    ToolSpec { name: "NPM", binaries: &["npm"], version_args: &["--version"] },
    ToolSpec { name: "Python", binaries: &["python3", "python"], version_args: &["--version"] },
    ToolSpec { name: "Pip", binaries: &["pip3", "pip"], version_args: &["--version"] },
    ToolSpec { name: "Git", binaries: &["git"], version_args: &["--version"] },
];

/// Probing seam, swapped for a fake in tests
pub trait ToolProber {
    fn probe(&self, spec: &ToolSpec) -> EnvironmentInfo;
}

/// Probes by spawning the tool's version command
pub struct SystemProber;

impl ToolProber for SystemProber {
    fn probe(&self, spec: &ToolSpec) -> EnvironmentInfo {
        for binary in spec.binaries {
            let result = run_command_with_timeout(binary, spec.version_args, PROBE_TIMEOUT);
            // Only a clean exit counts as available; a tool that cannot
            // report its version cannot be trusted to build anything
            if let CommandResult::Success(output) = &result {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                // java prints its version banner to stderr
                let version =
                    extract_version_token(&stdout).or_else(|| extract_version_token(&stderr));
                let install_path = which::which(binary).ok();
                return EnvironmentInfo::detected(spec.name, version, install_path);
            }
        }
        EnvironmentInfo::unavailable(spec.name)
    }
}

/// Probe registry: owns the prober and the cached probe results
pub struct EnvironmentRegistry {
    prober: Box<dyn ToolProber + Send + Sync>,
    cache: RwLock<Option<HashMap<String, EnvironmentInfo>>>,
}

impl Default for EnvironmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentRegistry {
    /// Registry backed by real command probes
    pub fn new() -> Self {
        Self::with_prober(Box::new(SystemProber))
    }

    /// Registry backed by a caller-supplied prober
    pub fn with_prober(prober: Box<dyn ToolProber + Send + Sync>) -> Self {
        Self {
            prober,
            cache: RwLock::new(None),
        }
    }

    /// Probe every known tool and fill the cache. Idempotent: a warm cache
    /// is left untouched.
    pub fn initialize(&self) {
        {
            let cache = self.cache.read().expect("environment cache lock poisoned");
            if cache.is_some() {
                return;
            }
        }

        // Probes are independent and dominated by process spawn latency,
        // so run them concurrently
        let results: Vec<EnvironmentInfo> = std::thread::scope(|scope| {
            let handles: Vec<_> = PROBED_TOOLS
                .iter()
                .map(|spec| scope.spawn(move || self.prober.probe(spec)))
                .collect();
            handles
                .into_iter()
                .zip(PROBED_TOOLS)
                .map(|(handle, spec)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| EnvironmentInfo::unavailable(spec.name))
                })
                .collect()
        });

        let mut map = HashMap::new();
        for info in results {
            map.insert(info.tool.clone(), info);
        }

        let mut cache = self.cache.write().expect("environment cache lock poisoned");
        // Another caller may have raced us here; first writer wins
        if cache.is_none() {
            *cache = Some(map);
        }
    }

    /// Cached info for one tool; probes lazily on first access.
    /// Unknown tool names yield None.
    pub fn environment(&self, tool: &str) -> Option<EnvironmentInfo> {
        self.initialize();
        let cache = self.cache.read().expect("environment cache lock poisoned");
        cache.as_ref().and_then(|map| map.get(tool).cloned())
    }

    /// All cached probe results, in the probe table's display order
    pub fn all_environments(&self) -> Vec<EnvironmentInfo> {
        self.initialize();
        let cache = self.cache.read().expect("environment cache lock poisoned");
        let map = cache.as_ref();
        PROBED_TOOLS
            .iter()
            .filter_map(|spec| map.and_then(|m| m.get(spec.name).cloned()))
            .collect()
    }

    /// Whether a tool probed as available. Unknown tools are unavailable.
    pub fn is_available(&self, tool: &str) -> bool {
        self.environment(tool).map(|e| e.available).unwrap_or(false)
    }

    /// Tools a project type needs, in check order
    pub fn required_tools_for_project_type(project_type: &ProjectType) -> &'static [&'static str] {
        project_type.required_tools()
    }

    /// True when every required tool for the type is available
    pub fn are_required_tools_available(&self, project_type: &ProjectType) -> bool {
        project_type
            .required_tools()
            .iter()
            .all(|tool| self.is_available(tool))
    }

    /// Required tools that are missing, in check order
    pub fn missing_tools(&self, project_type: &ProjectType) -> Vec<String> {
        project_type
            .required_tools()
            .iter()
            .filter(|tool| !self.is_available(tool))
            .map(|tool| tool.to_string())
            .collect()
    }

    /// Drop the cache so the next access re-probes the host
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write().expect("environment cache lock poisoned");
        *cache = None;
    }
}
