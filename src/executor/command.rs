//! Worker command lines
//!
//! Workers are started through the project's package manager:
//! `<pm> run <script> -- --reporter <reporter> --spec '<a,b>' <extra...>`

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

use crate::models::Bucket;

/// Reporter that makes the test runner emit one JSON event per line
pub const DEFAULT_REPORTER: &str = "cypress-parallel/json-stream.reporter.js";

/// Package manager used to run the worker script
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Detect from the environment the tool was launched in
    pub fn detect() -> Self {
        Self::from_user_agent(env::var("npm_config_user_agent").ok().as_deref())
    }

    fn from_user_agent(agent: Option<&str>) -> Self {
        match agent {
            Some(a) if a.starts_with("yarn") => PackageManager::Yarn,
            Some(a) if a.starts_with("pnpm") => PackageManager::Pnpm,
            _ => PackageManager::Npm,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "npm" => Some(PackageManager::Npm),
            "yarn" => Some(PackageManager::Yarn),
            "pnpm" => Some(PackageManager::Pnpm),
            _ => None,
        }
    }

    /// Executable name on the current platform
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm if cfg!(windows) => "npm.cmd",
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm if cfg!(windows) => "pnpm.cmd",
            PackageManager::Pnpm => "pnpm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageManager::Npm => write!(f, "npm"),
            PackageManager::Yarn => write!(f, "yarn"),
            PackageManager::Pnpm => write!(f, "pnpm"),
        }
    }
}

/// How to launch one worker for a bucket
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerCommand {
    program: String,
    prefix: Vec<String>,
    reporter: String,
    extra_args: Vec<String>,
}

impl WorkerCommand {
    /// Raw command; bucket arguments are appended after `prefix`
    pub fn new(program: impl Into<String>, prefix: Vec<String>) -> Self {
        Self {
            program: program.into(),
            prefix,
            reporter: DEFAULT_REPORTER.to_string(),
            extra_args: Vec::new(),
        }
    }

    /// `<pm> run <script> --`
    pub fn script(package_manager: PackageManager, script: impl Into<String>) -> Self {
        Self::new(
            package_manager.program(),
            vec!["run".to_string(), script.into(), "--".to_string()],
        )
    }

    pub fn with_reporter(mut self, reporter: impl Into<String>) -> Self {
        self.reporter = reporter.into();
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for a bucket
    pub fn args_for(&self, bucket: &Bucket) -> Vec<String> {
        let mut args = self.prefix.clone();
        args.push("--reporter".to_string());
        args.push(self.reporter.clone());
        args.push("--spec".to_string());
        args.push(bucket.spec_arg());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Printable command line for a bucket
    pub fn display_for(&self, bucket: &Bucket) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args_for(bucket));
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpecPath;

    #[test]
    fn test_detect_from_user_agent() {
        assert_eq!(
            PackageManager::from_user_agent(Some("yarn/1.22.19 npm/? node/v18.0.0")),
            PackageManager::Yarn
        );
        assert_eq!(
            PackageManager::from_user_agent(Some("pnpm/8.6.0 npm/? node/v18.0.0")),
            PackageManager::Pnpm
        );
        assert_eq!(
            PackageManager::from_user_agent(Some("npm/9.5.0 node/v18.0.0")),
            PackageManager::Npm
        );
        assert_eq!(PackageManager::from_user_agent(None), PackageManager::Npm);
    }

    #[test]
    fn test_package_manager_from_str() {
        assert_eq!(PackageManager::from_str("YARN"), Some(PackageManager::Yarn));
        assert_eq!(PackageManager::from_str("bun"), None);
    }

    #[test]
    fn test_script_args() {
        let mut bucket = Bucket::new(0);
        bucket.push(SpecPath::new("c", "c/a.spec.js"), 1);
        bucket.push(SpecPath::new("c", "c/b.spec.js"), 1);

        let command = WorkerCommand::script(PackageManager::Yarn, "cy:run")
            .with_extra_args(vec!["--browser".to_string(), "chrome".to_string()]);

        assert_eq!(command.program(), "yarn");
        assert_eq!(
            command.args_for(&bucket),
            vec![
                "run",
                "cy:run",
                "--",
                "--reporter",
                DEFAULT_REPORTER,
                "--spec",
                "'c/a.spec.js,c/b.spec.js'",
                "--browser",
                "chrome",
            ]
        );
    }

    #[test]
    fn test_custom_reporter() {
        let command = WorkerCommand::script(PackageManager::Npm, "e2e").with_reporter("my-reporter.js");
        let args = command.args_for(&Bucket::new(1));
        assert_eq!(args[4], "my-reporter.js");
        assert_eq!(args[6], "''");
        assert!(command.display_for(&Bucket::new(1)).contains("run e2e --"));
    }
}
