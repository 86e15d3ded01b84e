//! Governance checks for the pull-request CI workflow.
//!
//! The workflow is parsed as plain YAML and every check reports
//! violations instead of stopping at the first problem.

mod checks;

use crate::utils::error::{ForecastError, Result};
use serde::Serialize;
use std::path::Path;

pub const DEFAULT_WORKFLOW_PATH: &str = ".github/workflows/ci.yml";

pub const REQUIRED_JOBS: [&str; 7] = [
    "commitlint",
    "yamllint",
    "hadolint",
    "check",
    "test",
    "fmt",
    "clippy",
];

/// Jobs that install a Rust toolchain and run one cargo subcommand.
pub const RUST_JOBS: [&str; 4] = ["check", "test", "fmt", "clippy"];

/// Refs that move and therefore do not pin an action.
pub const FLOATING_REFS: [&str; 4] = ["main", "master", "latest", "HEAD"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub code: &'static str,
    pub message: String,
    pub hint: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
}

fn violation(
    code: &'static str,
    message: String,
    hint: &'static str,
    job: Option<&str>,
) -> Violation {
    Violation {
        code,
        message,
        hint,
        job: job.map(str::to_string),
    }
}

pub fn check_workflow(yaml: &str) -> Result<Vec<Violation>> {
    let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let workflow = document
        .as_mapping()
        .ok_or_else(|| ForecastError::config("workflow root must be a mapping"))?;

    let mut violations = checks::check_trigger(workflow);

    match workflow.get("jobs").and_then(serde_yaml::Value::as_mapping) {
        Some(jobs) => {
            violations.extend(checks::check_required_jobs(jobs));
            violations.extend(checks::check_job_independence(jobs));
            violations.extend(checks::check_pinned_actions(jobs));
            violations.extend(checks::check_rust_action_versions(jobs));
            violations.extend(checks::check_toolchain_consistency(jobs));
            violations.extend(checks::check_cargo_commands(jobs));
        }
        None => violations.push(violation(
            "WORKFLOW_JOB_MISSING",
            "workflow defines no jobs".to_string(),
            "add the lint and cargo jobs under `jobs:`",
            None,
        )),
    }

    Ok(violations)
}

pub fn check_workflow_file<P: AsRef<Path>>(path: P) -> Result<Vec<Violation>> {
    let content = std::fs::read_to_string(path)?;
    check_workflow(&content)
}
