//! Common utilities: external command execution with timeout and version
//! token extraction from tool output.

use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Timeout for a single tool probe (5 seconds)
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for registry HTTP requests (30 seconds)
pub const REGISTRY_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of running a command with timeout
#[derive(Debug)]
pub enum CommandResult {
    /// Command completed successfully with output
    Success(Output),
    /// Command failed with output
    Failed(Output),
    /// Command timed out and was killed
    TimedOut,
    /// Command could not be started
    SpawnError(String),
}

impl CommandResult {
    /// Returns true if the command succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }

    /// Get the output if the command completed (success or failure)
    pub fn output(&self) -> Option<&Output> {
        match self {
            CommandResult::Success(o) | CommandResult::Failed(o) => Some(o),
            _ => None,
        }
    }
}

/// Run a command with a timeout
///
/// # Arguments
/// * `cmd` - The command to run
/// * `args` - Arguments to pass to the command
/// * `timeout` - Maximum time to wait for the command
///
/// # Returns
/// A `CommandResult` indicating success, failure, timeout, or spawn error
pub fn run_command_with_timeout(cmd: &str, args: &[&str], timeout: Duration) -> CommandResult {
    // On Windows, run through cmd.exe to properly find .cmd/.bat files in PATH
    #[cfg(windows)]
    let mut child = {
        let full_cmd = if args.is_empty() {
            cmd.to_string()
        } else {
            format!("{} {}", cmd, args.join(" "))
        };
        match Command::new("cmd")
            .args(["/C", &full_cmd])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => return CommandResult::SpawnError(format!("Failed to start '{}': {}", cmd, e)),
        }
    };

    #[cfg(not(windows))]
    let mut child = match Command::new(cmd)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => return CommandResult::SpawnError(format!("Failed to start '{}': {}", cmd, e)),
    };

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let output = match child.wait_with_output() {
                Ok(o) => o,
                Err(e) => {
                    return CommandResult::SpawnError(format!(
                        "Failed to get output from '{}': {}",
                        cmd, e
                    ))
                }
            };

            if status.success() {
                CommandResult::Success(output)
            } else {
                CommandResult::Failed(output)
            }
        }
        Ok(None) => {
            // Timeout - kill the process and reap the zombie
            let _ = child.kill();
            let _ = child.wait();
            CommandResult::TimedOut
        }
        Err(e) => CommandResult::SpawnError(format!("Failed to wait for '{}': {}", cmd, e)),
    }
}

/// Extract a version token like `1.2.3`, `v20.11.1` or `1.8.0_392` from tool
/// output.
///
/// Tools print their version in wildly different shapes
/// (`openjdk version "17.0.2"`, `Apache Maven 3.9.6 (bc0240...)`,
/// `v20.11.1`). We scan line by line for the first token with at least two
/// dot-separated segments that each start with a digit.
pub fn extract_version_token(output: &str) -> Option<String> {
    for line in output.lines() {
        for raw in
            line.split(|c: char| c.is_whitespace() || matches!(c, '"' | '(' | ')' | ',' | '\''))
        {
            let token = raw.trim_start_matches('v');
            if is_version_token(token) {
                return Some(token.to_string());
            }
        }
    }
    None
}

fn is_version_token(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() < 2 {
        return false;
    }
    segments
        .iter()
        .all(|s| s.chars().next().is_some_and(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_success() {
        #[cfg(windows)]
        let result = run_command_with_timeout("cmd", &["/c", "echo", "hello"], PROBE_TIMEOUT);
        #[cfg(not(windows))]
        let result = run_command_with_timeout("echo", &["hello"], PROBE_TIMEOUT);

        assert!(result.is_success());
    }

    #[test]
    fn test_run_command_spawn_error() {
        let result = run_command_with_timeout("nonexistent_command_xyz_123", &[], PROBE_TIMEOUT);

        assert!(matches!(result, CommandResult::SpawnError(_)));
    }

    #[test]
    fn test_extract_version_from_quoted_java_output() {
        let out = "openjdk version \"17.0.2\" 2022-01-18";
        assert_eq!(extract_version_token(out), Some("17.0.2".to_string()));
    }

    #[test]
    fn test_extract_version_from_maven_output() {
        let out = "Apache Maven 3.9.6 (bc0240f3c744dd6b6ec2920b3cd08dcc295161ae)";
        assert_eq!(extract_version_token(out), Some("3.9.6".to_string()));
    }

    #[test]
    fn test_extract_version_strips_v_prefix() {
        assert_eq!(
            extract_version_token("v20.11.1"),
            Some("20.11.1".to_string())
        );
    }

    #[test]
    fn test_extract_version_two_segment() {
        let out = "pip 24.0 from /usr/lib/python3/dist-packages/pip (python 3.11)";
        assert_eq!(extract_version_token(out), Some("24.0".to_string()));
    }

    #[test]
    fn test_extract_version_ignores_dates_and_words() {
        assert_eq!(extract_version_token("released 2024-01-18 build"), None);
        assert_eq!(extract_version_token("no version here"), None);
    }

    #[test]
    fn test_extract_version_underscore_build() {
        let out = "java version \"1.8.0_392\"";
        assert_eq!(extract_version_token(out), Some("1.8.0_392".to_string()));
    }
}
