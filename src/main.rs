use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use ticklist::config::{self, Config};
use ticklist::controller::{Command, Controller, Outcome};
use ticklist::logging;
use ticklist::store::{Filter, Store, Task, TaskId, ThemeMode, parse_due};
use ticklist::tui;

#[derive(Parser)]
#[command(
    name = "ticklist",
    version = env!("TICKLIST_VERSION"),
    about = "A terminal to-do list with due dates and a countdown to the next deadline"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); the dashboard logs to <data-dir>/ticklist.log
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Data directory (default: $TICKLIST_HOME or ~/.ticklist)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the TUI dashboard (default)
    Dashboard,
    /// Create the data directory and database
    Init,
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,
    },
    /// List tasks, earliest due first
    List {
        /// all, pending or completed (default: `default_filter` from config)
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Toggle a task between pending and done
    Toggle {
        /// Task position as shown by `list`
        position: usize,
    },
    /// Replace a task's text
    Edit {
        /// Task position as shown by `list`
        position: usize,
        /// New text
        text: String,
    },
    /// Remove a task
    Remove {
        /// Task position as shown by `list`
        position: usize,
    },
    /// Remove every task
    Clear {
        /// Confirm deleting all tasks
        #[arg(long)]
        yes: bool,
    },
    /// Print the countdown to the next due task
    Countdown,
    /// Show or change the dashboard theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeArg>,
    },
    /// Export tasks as JSON
    Export {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = config::resolve_base_dir(cli.data_dir.as_deref())?;
    config::ensure_dirs(&base)?;
    let cfg = config::load(&base)?;
    let command = cli.command.unwrap_or(Commands::Dashboard);

    let log_file = matches!(command, Commands::Dashboard).then(|| config::log_path(&base));
    logging::init(cli.verbose, cfg.log_level.as_deref(), log_file.as_deref())?;

    let store = Store::open(&config::db_path(&base))?;
    store.migrate()?;
    tracing::debug!(data_dir = %base.display(), "store ready");

    match command {
        Commands::Dashboard => {
            let controller = Controller::load(store, cfg.default_filter)?;
            tui::run(controller, cfg.theme)
        }
        Commands::Init => {
            println!("ticklist initialized at {}", base.display());
            Ok(())
        }
        command => run_command(command, store, &cfg),
    }
}

/// One-shot subcommands that go through the controller and exit.
fn run_command(command: Commands, store: Store, cfg: &Config) -> Result<()> {
    let mut controller = Controller::load(store, cfg.default_filter)?;

    match command {
        Commands::Add { text, due } => {
            let due = match due.as_deref() {
                Some(raw) => parse_due(raw)
                    .with_context(|| format!("invalid due date '{raw}', expected YYYY-MM-DD"))?,
                None => None,
            };
            // Blank text is a silent no-op, same as in the dashboard.
            if controller.try_dispatch(Command::Add { text, due })? == Outcome::Ignored {
                return Ok(());
            }
            let tasks = &controller.state().tasks;
            if let Some(task) = tasks.as_slice().last() {
                println!("Added #{}: {}", tasks.len(), describe(task));
            }
            Ok(())
        }
        Commands::List { filter } => {
            let filter = match filter.as_deref() {
                Some(raw) => Filter::parse(raw).with_context(|| {
                    format!("unknown filter '{raw}', expected all, pending or completed")
                })?,
                None => cfg.default_filter,
            };
            controller.try_dispatch(Command::SetFilter(filter))?;
            print_list(&controller);
            Ok(())
        }
        Commands::Toggle { position } => {
            let id = task_at(&controller, position)?;
            controller.try_dispatch(Command::ToggleDone(id))?;
            if let Some(task) = controller.state().tasks.get(id) {
                let state = if task.done { "done" } else { "pending" };
                println!("#{position} {} is now {state}", task.text);
            }
            Ok(())
        }
        Commands::Edit { position, text } => {
            let id = task_at(&controller, position)?;
            let before = controller.state().tasks.get(id).map(|t| t.text.clone());
            // Blank text keeps the old value but still persists.
            controller.try_dispatch(Command::EditText { id, text })?;
            if let Some(task) = controller.state().tasks.get(id) {
                if before.as_deref() == Some(task.text.as_str()) {
                    println!("#{position} unchanged: {}", describe(task));
                } else {
                    println!("Updated #{position}: {}", describe(task));
                }
            }
            Ok(())
        }
        Commands::Remove { position } => {
            let id = task_at(&controller, position)?;
            let text = controller
                .state()
                .tasks
                .get(id)
                .map(|t| t.text.clone())
                .unwrap_or_default();
            controller.try_dispatch(Command::Remove(id))?;
            println!("Removed #{position}: {text}");
            Ok(())
        }
        Commands::Clear { yes } => {
            let count = controller.state().tasks.len();
            if !yes {
                bail!("refusing to clear {count} task(s) without --yes");
            }
            controller.try_dispatch(Command::ClearAll)?;
            println!("Cleared {count} task(s)");
            Ok(())
        }
        Commands::Countdown => {
            println!("{}", controller.state().countdown(Local::now().naive_local()));
            Ok(())
        }
        Commands::Theme { mode } => {
            let current = controller.state().theme;
            let wanted = match mode {
                None => current,
                Some(ThemeArg::Toggle) => current.toggled(),
                Some(ThemeArg::Dark) => ThemeMode::Dark,
                Some(ThemeArg::Light) => ThemeMode::Light,
            };
            if wanted != current {
                controller.try_dispatch(Command::ToggleTheme)?;
            }
            println!("theme: {}", controller.state().theme.as_str());
            Ok(())
        }
        Commands::Export { output } => export(&controller, output.as_deref()),
        Commands::Dashboard | Commands::Init => Ok(()),
    }
}

/// Resolve a 1-based canonical position to a task handle.
fn task_at(controller: &Controller, position: usize) -> Result<TaskId> {
    let tasks = &controller.state().tasks;
    tasks.id_at(position).with_context(|| {
        format!(
            "no task at position {position} (there are {} task(s))",
            tasks.len()
        )
    })
}

fn describe(task: &Task) -> String {
    match task.due {
        Some(due) => format!("{} (Due: {})", task.text, due.format("%Y-%m-%d")),
        None => task.text.clone(),
    }
}

fn print_list(controller: &Controller) {
    let state = controller.state();
    let now = Local::now().naive_local();
    let today = now.date();
    let visible = state.visible();

    if visible.is_empty() {
        if state.tasks.is_empty() {
            println!("No tasks. Use `ticklist add <text>` to add one.");
        } else {
            println!("No {} tasks.", state.filter.as_str());
        }
    } else {
        for task in &visible {
            let position = state.tasks.position_of(task.id).unwrap_or_default();
            let marker = if task.is_overdue(today) { "  OVERDUE" } else { "" };
            println!(
                "  #{position:<3} {} {}{marker}",
                task.symbol(),
                describe(task)
            );
        }
    }

    println!();
    println!("{}", state.countdown(now));
}

fn export(controller: &Controller, output: Option<&Path>) -> Result<()> {
    let tasks = controller.state().tasks.as_slice();
    let export = serde_json::json!({
        "exported_at": Local::now().to_rfc3339(),
        "tasks": tasks,
    });
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported {} tasks to {}", tasks.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
