//! Output formatting: human-readable text and a stable JSON envelope.

use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use crate::compat::{CheckResult, CheckSeverity};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// One finding in the JSON envelope
#[derive(Debug, Serialize)]
pub struct Issue {
    pub name: String,
    pub category: String,
    pub severity: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl From<&CheckResult> for Issue {
    fn from(result: &CheckResult) -> Self {
        let severity = match result.severity {
            CheckSeverity::Pass => "pass",
            CheckSeverity::Info => "info",
            CheckSeverity::Warning => "warning",
            CheckSeverity::Error => "error",
        };
        Self {
            name: result.name.clone(),
            category: result.category.clone(),
            severity: severity.to_string(),
            message: result.message.clone(),
            suggested_fix: result.suggested_fix.clone(),
        }
    }
}

/// JSON envelope emitted by every command in `--format json` mode
#[derive(Debug, Serialize)]
pub struct PrefabOutput {
    pub command: String,
    pub success: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl PrefabOutput {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            success: true,
            timestamp: Utc::now().to_rfc3339(),
            ready: None,
            issues: Vec::new(),
            data: None,
        }
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = Some(ready);
        self
    }

    pub fn with_issues(mut self, results: &[CheckResult]) -> Self {
        self.issues = results.iter().map(Issue::from).collect();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Print a finding as a colored one-liner with a severity icon
pub fn print_check_result(result: &CheckResult) {
    match result.severity {
        CheckSeverity::Pass => {
            println!("  {} {}", "✓".green(), result.name);
        }
        CheckSeverity::Info => {
            println!("  {} {}: {}", "i".blue(), result.name, result.message);
        }
        CheckSeverity::Warning => {
            println!("  {} {}: {}", "⚠".yellow(), result.name.yellow(), result.message);
            if let Some(fix) = &result.suggested_fix {
                println!("      {} {}", "fix:".dimmed(), fix.dimmed());
            }
        }
        CheckSeverity::Error => {
            println!("  {} {}: {}", "✗".red(), result.name.red(), result.message);
            if let Some(fix) = &result.suggested_fix {
                println!("      {} {}", "fix:".dimmed(), fix.dimmed());
            }
        }
    }
}
