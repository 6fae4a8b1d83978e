use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result, bail};
use std::path::PathBuf;
use todostore::{Config, DueStatus, Priority, StatusFilter, Task, TaskId, TaskStore, due_status, filter, statistics, today};

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - Personal task list with JSON file persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the task file (overrides config)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        text: String,

        /// High, Medium or Low
        #[arg(short, long, default_value = "Medium")]
        priority: Priority,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Replace the text of a task
    Update { id: TaskId, text: String },

    /// Mark a task complete, or pending again
    Toggle { id: TaskId },

    /// Delete a task
    Delete {
        id: TaskId,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// List tasks
    List {
        /// All, Pending, Completed, High, Medium or Low
        #[arg(short, long, default_value = "All")]
        filter: StatusFilter,

        /// Case-insensitive text search
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show task statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.store_path {
        config.store_path = path;
    }

    // Setup tracing
    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "Using config");

    let mut store = TaskStore::open(&config.store_path)
        .with_context(|| format!("Failed to open task file {}", config.store_path.display()))?;

    match cli.command {
        Commands::Add { text, priority, due } => {
            let task = store.add(&text, priority, due.as_deref())?;
            println!("Added task #{}", task.id);
        }
        Commands::Update { id, text } => {
            let task = store.update(id, &text)?;
            println!("Updated task #{}", task.id);
        }
        Commands::Toggle { id } => {
            let task = store.toggle_complete(id)?;
            let status = if task.completed { "completed" } else { "pending" };
            println!("Task #{} marked as {}", task.id, status);
        }
        Commands::Delete { id, yes } => {
            if !yes {
                bail!("Refusing to delete task #{} without --yes", id);
            }
            store.delete(id)?;
            println!("Deleted task #{}", id);
        }
        Commands::List { filter: status, search } => {
            let today = today();
            let tasks = filter(store.list(), status, &search);
            if tasks.is_empty() {
                println!("No tasks");
            }
            for task in &tasks {
                println!("{}", render_task(task, due_status(task, today)));
            }
        }
        Commands::Stats => {
            println!("{}", statistics(store.list(), today()));
        }
    }

    Ok(())
}

fn render_task(task: &Task, due: DueStatus) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut line = format!("#{:<4} [{}] {} {}", task.id, check, task.priority.marker(), task.text);

    let due_text = due.to_string();
    if !due_text.is_empty() {
        line.push_str(&format!(" ({})", due_text));
    }

    if due.is_overdue() {
        line.red().to_string()
    } else if due == DueStatus::DueToday {
        line.yellow().to_string()
    } else if !task.is_pending() {
        line.dimmed().to_string()
    } else {
        line
    }
}
