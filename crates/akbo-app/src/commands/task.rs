//! akbo task command

use clap::Args;
use console::style;
use shared::AppConfig;

use crate::tasks::{self, TaskAction, TaskTable, DEFAULT_TASK};

#[derive(Debug, Args)]
pub struct TaskCommand {
    /// Task to run (default, dev, unit-test, lint, format, type-check)
    #[arg(default_value = DEFAULT_TASK)]
    pub alias: String,

    /// List tasks instead of running one
    #[arg(short, long)]
    pub list: bool,

    /// Print the command without running it
    #[arg(long)]
    pub dry_run: bool,
}

impl TaskCommand {
    /// Returns the exit code of the wrapped tool
    pub fn run(&self, config: &AppConfig) -> anyhow::Result<i32> {
        let table = TaskTable::builtin().with_overrides(&config.tasks);

        if self.list {
            print_tasks(&table);
            return Ok(0);
        }

        let invocation = table.resolve(&self.alias)?;
        eprintln!("{} {}", style("→").cyan().bold(), style(invocation.display()).bold());

        if self.dry_run {
            return Ok(0);
        }
        Ok(tasks::run(invocation)?)
    }
}

fn print_tasks(table: &TaskTable) {
    println!("Available tasks:");
    for alias in table.aliases() {
        let Some(task) = table.get(alias) else {
            continue;
        };
        let target = match &task.action {
            TaskAction::Alias(next) => format!("-> {}", next),
            TaskAction::Run(invocation) => invocation.display(),
        };
        println!(
            "  {:<12} {}  {}",
            style(alias).green(),
            task.description,
            style(target).dim()
        );
    }
}
