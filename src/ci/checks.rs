use super::{violation, Violation, FLOATING_REFS, REQUIRED_JOBS, RUST_JOBS};
use serde_yaml::{Mapping, Value};

pub(super) const CARGO_ACTION: &str = "actions-rs/cargo@v1";
pub(super) const TOOLCHAIN_ACTION: &str = "actions-rs/toolchain@v1";

fn steps(job: &Value) -> &[Value] {
    job.get("steps")
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn uses(step: &Value) -> Option<&str> {
    step.get("uses").and_then(Value::as_str)
}

fn with_str<'a>(step: &'a Value, name: &str) -> Option<&'a str> {
    step.get("with")?.get(name)?.as_str()
}

/// Accepts `true` as well as the string `"true"`.
fn with_bool(step: &Value, name: &str) -> Option<bool> {
    match step.get("with")?.get(name)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn action_name(uses: &str) -> &str {
    uses.split('@').next().unwrap_or(uses)
}

pub(super) fn check_trigger(workflow: &Mapping) -> Vec<Violation> {
    // YAML 1.1 parsers read a bare `on` key as boolean true
    let trigger = workflow
        .get("on")
        .or_else(|| workflow.get(Value::Bool(true)));

    let events: Vec<String> = match trigger {
        Some(Value::String(event)) => vec![event.clone()],
        Some(Value::Sequence(events)) => events
            .iter()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect(),
        Some(Value::Mapping(events)) => events
            .keys()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    if events == ["pull_request"] {
        return Vec::new();
    }

    vec![violation(
        "WORKFLOW_TRIGGER_NOT_PR_ONLY",
        format!(
            "workflow must trigger on pull_request only, found [{}]",
            events.join(", ")
        ),
        "set `on: pull_request` and drop push/schedule triggers",
        None,
    )]
}

pub(super) fn check_required_jobs(jobs: &Mapping) -> Vec<Violation> {
    REQUIRED_JOBS
        .iter()
        .copied()
        .filter(|name| !jobs.contains_key(*name))
        .map(|name| {
            violation(
                "WORKFLOW_JOB_MISSING",
                format!("required job `{}` is not defined", name),
                "restore the job; every linter and cargo stage runs as its own job",
                Some(name),
            )
        })
        .collect()
}

pub(super) fn check_job_independence(jobs: &Mapping) -> Vec<Violation> {
    jobs.iter()
        .filter(|(_, job)| job.get("needs").is_some())
        .filter_map(|(name, _)| name.as_str())
        .map(|name| {
            violation(
                "WORKFLOW_JOB_DEPENDENCY",
                format!("job `{}` declares `needs`", name),
                "jobs run in parallel and fail independently; remove `needs`",
                Some(name),
            )
        })
        .collect()
}

pub(super) fn check_pinned_actions(jobs: &Mapping) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (name, job) in jobs {
        let name = name.as_str().unwrap_or_default();
        // job-level `uses:` calls a reusable workflow
        let job_uses = uses(job).into_iter();
        for target in job_uses.chain(steps(job).iter().filter_map(uses)) {
            if target.starts_with("./") || target.starts_with("docker://") {
                continue;
            }
            let pinned = match target.split_once('@') {
                Some((_, reference)) => {
                    !reference.is_empty() && !FLOATING_REFS.contains(&reference)
                }
                None => false,
            };
            if !pinned {
                violations.push(violation(
                    "WORKFLOW_ACTION_UNPINNED",
                    format!("job `{}` uses `{}` without a pinned version", name, target),
                    "reference a release tag or commit SHA, e.g. `actions/checkout@v4`",
                    Some(name),
                ));
            }
        }
    }
    violations
}

pub(super) fn check_rust_action_versions(jobs: &Mapping) -> Vec<Violation> {
    let mut violations = Vec::new();
    for name in RUST_JOBS {
        let Some(job) = jobs.get(name) else {
            continue;
        };
        let job_uses: Vec<&str> = steps(job).iter().filter_map(uses).collect();

        for expected in [TOOLCHAIN_ACTION, CARGO_ACTION] {
            if !job_uses.contains(&expected) {
                violations.push(violation(
                    "WORKFLOW_RUST_ACTION_VERSION",
                    format!("job `{}` does not reference `{}`", name, expected),
                    "Rust jobs use actions-rs/toolchain@v1 and actions-rs/cargo@v1",
                    Some(name),
                ));
            }
        }

        for other in job_uses.iter().filter(|u| {
            u.starts_with("actions-rs/") && **u != TOOLCHAIN_ACTION && **u != CARGO_ACTION
        }) {
            violations.push(violation(
                "WORKFLOW_RUST_ACTION_VERSION",
                format!("job `{}` references `{}`", name, other),
                "Rust jobs use actions-rs/toolchain@v1 and actions-rs/cargo@v1",
                Some(name),
            ));
        }
    }
    violations
}

pub(super) fn check_toolchain_consistency(jobs: &Mapping) -> Vec<Violation> {
    let mut violations = Vec::new();
    for name in RUST_JOBS {
        let Some(job) = jobs.get(name) else {
            continue;
        };
        let toolchain_steps = steps(job)
            .iter()
            .filter(|step| uses(step).map(action_name) == Some(action_name(TOOLCHAIN_ACTION)));

        for step in toolchain_steps {
            let profile = with_str(step, "profile");
            let toolchain = with_str(step, "toolchain");
            let override_flag = with_bool(step, "override");

            if profile != Some("minimal") || toolchain != Some("stable") || override_flag != Some(true)
            {
                violations.push(violation(
                    "WORKFLOW_TOOLCHAIN_DRIFT",
                    format!(
                        "job `{}` toolchain step has profile={:?} toolchain={:?} override={:?}",
                        name, profile, toolchain, override_flag
                    ),
                    "every Rust job sets profile: minimal, toolchain: stable, override: true",
                    Some(name),
                ));
            }
        }
    }
    violations
}

pub(super) fn check_cargo_commands(jobs: &Mapping) -> Vec<Violation> {
    let mut violations = Vec::new();
    for name in RUST_JOBS {
        let Some(job) = jobs.get(name) else {
            continue;
        };
        let cargo_steps: Vec<&Value> = steps(job)
            .iter()
            .filter(|step| uses(step).map(action_name) == Some(action_name(CARGO_ACTION)))
            .collect();

        let matching = cargo_steps
            .iter()
            .find(|step| with_str(step, "command") == Some(name));

        let Some(step) = matching else {
            if !cargo_steps.is_empty() {
                violations.push(violation(
                    "WORKFLOW_CARGO_COMMAND_MISMATCH",
                    format!("job `{}` never runs `cargo {}`", name, name),
                    "each Rust job runs the cargo subcommand it is named after",
                    Some(name),
                ));
            }
            continue;
        };

        let args: Vec<&str> = with_str(step, "args")
            .map(|a| a.split_whitespace().collect())
            .unwrap_or_default();

        let missing = match name {
            "fmt" if !args.contains(&"--check") => Some("`--check`"),
            "clippy" if !denies_warnings(&args) => Some("`-D warnings`"),
            _ => None,
        };
        if let Some(flag) = missing {
            violations.push(violation(
                "WORKFLOW_CARGO_COMMAND_MISMATCH",
                format!("job `{}` runs cargo {} without {}", name, name, flag),
                "fmt must fail on diffs and clippy must treat warnings as errors",
                Some(name),
            ));
        }
    }
    violations
}

fn denies_warnings(args: &[&str]) -> bool {
    args.windows(2).any(|pair| pair == ["-D", "warnings"]) || args.contains(&"-Dwarnings")
}
