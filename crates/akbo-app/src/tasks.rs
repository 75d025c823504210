//! Developer tasks - named shortcuts for the workspace toolchain
//!
//! Each task is a straight passthrough to an external tool. Output goes
//! to the terminal untouched and the tool's exit code is the result.
//!
//! | Alias      | Runs                                                 |
//! |------------|------------------------------------------------------|
//! | default    | `dev`                                                |
//! | dev        | `cargo watch -x "run -p akbo-app -- serve"`          |
//! | unit-test  | `cargo test --workspace`                             |
//! | lint       | `cargo clippy --workspace --all-targets -- -D warnings` |
//! | format     | `cargo fmt --all`                                    |
//! | type-check | `cargo check --workspace --all-targets`              |

use std::collections::BTreeMap;
use std::process::Command;

use shared::{AkboError, Result, TaskNotFoundError};
use tracing::debug;

pub const DEFAULT_TASK: &str = "default";

const MAX_ALIAS_DEPTH: usize = 8;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from `[program, args...]`; `None` when empty
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }

    /// Shell-like rendering for display
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("\"{}\"", part)
                } else {
                    part.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What a task does when invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Run another task
    Alias(String),
    /// Run an external program
    Run(Invocation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub action: TaskAction,
}

/// All known tasks, keyed by alias
#[derive(Debug, Clone)]
pub struct TaskTable {
    tasks: BTreeMap<String, Task>,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TaskTable {
    /// Tasks for this workspace
    pub fn builtin() -> Self {
        let mut table = Self {
            tasks: BTreeMap::new(),
        };

        table.insert(
            DEFAULT_TASK,
            "Same as dev",
            TaskAction::Alias("dev".to_string()),
        );
        table.insert(
            "dev",
            "Run the API server, restarting on source changes",
            TaskAction::Run(Invocation::new(
                "cargo",
                ["watch", "-x", "run -p akbo-app -- serve"],
            )),
        );
        table.insert(
            "unit-test",
            "Run the unit tests",
            TaskAction::Run(Invocation::new("cargo", ["test", "--workspace"])),
        );
        table.insert(
            "lint",
            "Static lint pass",
            TaskAction::Run(Invocation::new(
                "cargo",
                ["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
            )),
        );
        table.insert(
            "format",
            "Rewrite formatting",
            TaskAction::Run(Invocation::new("cargo", ["fmt", "--all"])),
        );
        table.insert(
            "type-check",
            "Type-check the workspace",
            TaskAction::Run(Invocation::new(
                "cargo",
                ["check", "--workspace", "--all-targets"],
            )),
        );

        table
    }

    /// Replace or add tasks from config (`alias -> [program, args...]`)
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, Vec<String>>) -> Self {
        for (alias, parts) in overrides {
            let Some(invocation) = Invocation::from_parts(parts) else {
                continue;
            };
            let description = self
                .tasks
                .get(alias)
                .map(|t| t.description.clone())
                .unwrap_or_else(|| "Custom task".to_string());
            self.insert(alias, &description, TaskAction::Run(invocation));
        }
        self
    }

    fn insert(&mut self, alias: &str, description: &str, action: TaskAction) {
        self.tasks.insert(
            alias.to_string(),
            Task {
                description: description.to_string(),
                action,
            },
        );
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    pub fn get(&self, alias: &str) -> Option<&Task> {
        self.tasks.get(alias)
    }

    /// Follow aliases down to the program to run
    pub fn resolve(&self, alias: &str) -> Result<&Invocation> {
        let mut current = alias;
        for _ in 0..MAX_ALIAS_DEPTH {
            let task = self.tasks.get(current).ok_or_else(|| TaskNotFoundError {
                alias: current.to_string(),
                available: self.aliases().into_iter().map(String::from).collect(),
            })?;

            match &task.action {
                TaskAction::Run(invocation) => return Ok(invocation),
                TaskAction::Alias(next) => current = next,
            }
        }

        Err(AkboError::Config(format!(
            "task '{}' aliases too deeply (cycle?)",
            alias
        )))
    }
}

/// Run an invocation with inherited stdio and return its exit code.
///
/// A child killed by a signal reports exit code 1.
pub fn run(invocation: &Invocation) -> Result<i32> {
    debug!(program = %invocation.program, args = ?invocation.args, "Launching task");

    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .status()
        .map_err(|source| AkboError::Launch {
            program: invocation.program.clone(),
            source,
        })?;

    Ok(status.code().unwrap_or(1))
}
