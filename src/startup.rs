// Startup guard - pre-flight checks before the server process is launched,
// plus the process-wide fatal error hook.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use crate::config::LaunchConfig;
use crate::core::document_path::get_path;
use crate::error::{AppError, AppResult};

/// Something that prevents a launch
#[derive(Debug, Clone, PartialEq)]
pub enum StartupIssue {
    MissingFile(PathBuf),
    InvalidManifest { path: PathBuf, reason: String },
    MissingStartCommand(PathBuf),
}

impl fmt::Display for StartupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupIssue::MissingFile(path) => {
                write!(f, "required file {} is missing", path.display())
            }
            StartupIssue::InvalidManifest { path, reason } => {
                write!(f, "manifest {} is invalid: {}", path.display(), reason)
            }
            StartupIssue::MissingStartCommand(path) => {
                write!(f, "manifest {} has no scripts.start command", path.display())
            }
        }
    }
}

/// The command the launcher will run
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchPlan {
    fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Run to completion; a signal-terminated child counts as exit status 1
    pub fn run(&self) -> AppResult<i32> {
        tracing::info!(program = %self.program, args = ?self.args, "launching");
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|e| {
                AppError::StartupError(format!("Failed to start {}: {}", self.program, e))
            })?;
        Ok(status.code().unwrap_or(1))
    }
}

pub struct StartupGuard {
    config: LaunchConfig,
    root: PathBuf,
}

impl StartupGuard {
    pub fn new(config: LaunchConfig) -> Self {
        Self::with_root(config, ".")
    }

    /// Resolve relative paths against `root` instead of the working directory
    pub fn with_root(config: LaunchConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Every problem found, in check order
    pub fn check(&self) -> Vec<StartupIssue> {
        let mut issues: Vec<StartupIssue> = self
            .config
            .required_files
            .iter()
            .filter(|path| !self.resolve(path).is_file())
            .map(|path| StartupIssue::MissingFile(path.clone()))
            .collect();

        if let Err(issue) = self.start_command() {
            // a missing manifest is already reported above
            if !issues.contains(&StartupIssue::MissingFile(self.config.manifest.clone())) {
                issues.push(issue);
            }
        }
        issues
    }

    fn start_command(&self) -> Result<LaunchPlan, StartupIssue> {
        let manifest = &self.config.manifest;
        let invalid = |reason: String| StartupIssue::InvalidManifest {
            path: manifest.clone(),
            reason,
        };

        let raw = std::fs::read_to_string(self.resolve(manifest))
            .map_err(|e| invalid(e.to_string()))?;
        let parsed: Value = serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;

        get_path(&parsed, "scripts.start")
            .and_then(Value::as_str)
            .and_then(LaunchPlan::parse)
            .ok_or_else(|| StartupIssue::MissingStartCommand(manifest.clone()))
    }

    /// The launch plan, or a StartupError naming every issue
    pub fn preflight(&self) -> AppResult<LaunchPlan> {
        let issues = self.check();
        if !issues.is_empty() {
            for issue in &issues {
                tracing::error!(%issue, "startup check failed");
            }
            let summary: Vec<String> = issues.iter().map(ToString::to_string).collect();
            return Err(AppError::StartupError(summary.join("; ")));
        }
        self.start_command()
            .map_err(|issue| AppError::StartupError(issue.to_string()))
    }
}

/// Log any panic, from any thread or task, with its location and a
/// backtrace, then terminate the process with status 1.
pub fn install_fatal_error_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        let location = info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());
        let backtrace = Backtrace::force_capture();

        tracing::error!(%message, %location, %backtrace, "fatal error, shutting down");
        std::process::exit(1);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_plan_splits_on_whitespace() {
        let plan = LaunchPlan::parse("  cargo  run --release ").unwrap();
        assert_eq!(plan.program, "cargo");
        assert_eq!(plan.args, vec!["run", "--release"]);
        assert!(LaunchPlan::parse("   ").is_none());
    }
}
