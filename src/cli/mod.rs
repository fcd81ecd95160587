//! CLI argument definitions for ananke.

use clap::{Args, Parser, Subcommand};

use crate::models::MAX_PRIORITY;
use crate::storage::{validate_epic_id, validate_task_id};

/// Largest accepted `--limit` / `--recent`.
pub const MAX_COUNT: usize = 20;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ANANKE_GIT_COMMIT"),
    " ",
    env!("ANANKE_BUILD_TIMESTAMP"),
    ")"
);

/// ananke - durable task memory for AI agents and humans.
///
/// Start with `ananke init`, then `ananke ready` to find work.
#[derive(Parser, Debug)]
#[command(name = "ananke")]
#[command(version = VERSION, about = "AI-native local execution layer: epics, tasks, blockers and a ready queue", long_about = None)]
pub struct Cli {
    /// Print a JSON envelope instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Workspace root holding `.ananke/`. Defaults to the nearest ancestor
    /// containing `.git`, else the current directory.
    #[arg(long, global = true, env = "ANANKE_ROOT", value_name = "PATH")]
    pub root: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize .ananke workspace scaffold
    Init {
        /// Create missing pieces and refresh SKILL.md without touching data
        #[arg(long, conflicts_with = "reset")]
        update: bool,

        /// Delete .ananke and scaffold from scratch
        #[arg(long)]
        reset: bool,
    },

    /// Epic management commands
    Epic {
        #[command(subcommand)]
        command: EpicCommands,
    },

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Dependency (blocks) management commands
    Dep {
        #[command(subcommand)]
        command: DepCommands,
    },

    /// List tasks ready to execute
    Ready {
        /// Only consider tasks in this epic
        #[arg(long, value_parser = parse_epic_id)]
        epic: Option<String>,

        /// Maximum number of tasks to return (1-20)
        #[arg(long, value_parser = parse_count)]
        limit: Option<usize>,
    },

    /// Generate a task context pack
    Pack {
        /// Task ID (e.g., TSK-001)
        #[arg(value_parser = parse_task_id)]
        id: String,

        /// Output format
        #[arg(long, default_value = "md", value_parser = ["md", "json"])]
        format: String,

        /// Number of recently finished tasks to include (1-20)
        #[arg(long, default_value_t = 5, value_parser = parse_count)]
        recent: usize,

        /// Return the pack in the output instead of writing .ananke/packs/
        #[arg(long)]
        stdout: bool,
    },
}

/// Epic subcommands
#[derive(Subcommand, Debug)]
pub enum EpicCommands {
    /// Create a new epic
    Create {
        #[arg(long, value_parser = parse_non_empty)]
        title: String,

        /// What finishing this epic achieves
        #[arg(long, value_parser = parse_non_empty)]
        goal: String,

        /// Constraint (repeatable)
        #[arg(long = "constraint", value_parser = parse_non_empty)]
        constraints: Vec<String>,

        /// Decision (repeatable)
        #[arg(long = "decision", value_parser = parse_non_empty)]
        decisions: Vec<String>,

        #[arg(long)]
        context: Option<String>,
    },

    /// Show one epic by id
    Show {
        /// Epic ID (e.g., EPC-001)
        #[arg(value_parser = parse_epic_id)]
        id: String,
    },

    /// Update an existing epic
    Update(EpicUpdateArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct EpicUpdateArgs {
    /// Epic ID (e.g., EPC-001)
    #[arg(value_parser = parse_epic_id)]
    pub id: String,

    #[arg(long, value_parser = parse_non_empty)]
    pub title: Option<String>,

    #[arg(long, value_parser = parse_non_empty)]
    pub goal: Option<String>,

    #[arg(long, value_parser = ["active", "paused", "done"])]
    pub status: Option<String>,

    #[arg(long)]
    pub context: Option<String>,

    /// Condensed learnings
    #[arg(long)]
    pub digest: Option<String>,

    /// Append a constraint if not already present (repeatable)
    #[arg(long = "add-constraint", value_parser = parse_non_empty)]
    pub add_constraints: Vec<String>,

    /// Append a decision if not already present (repeatable)
    #[arg(long = "add-decision", value_parser = parse_non_empty)]
    pub add_decisions: Vec<String>,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a new task
    Create {
        /// Owning epic ID
        #[arg(long, value_parser = parse_epic_id)]
        epic: String,

        #[arg(long, value_parser = parse_non_empty)]
        title: String,

        #[arg(long, value_parser = parse_non_empty)]
        description: String,

        /// Priority (0-4, lower is more urgent). Defaults to config `default-priority`.
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<u8>,

        /// Acceptance criterion (repeatable)
        #[arg(long, value_parser = parse_non_empty)]
        acceptance: Vec<String>,
    },

    /// Show one task by id
    Show {
        /// Task ID (e.g., TSK-001)
        #[arg(value_parser = parse_task_id)]
        id: String,
    },

    /// Update an existing task
    Update(TaskUpdateArgs),

    /// Close a task with outcome summary
    Close {
        /// Task ID (e.g., TSK-001)
        #[arg(value_parser = parse_task_id)]
        id: String,

        /// What was done and what was learned
        #[arg(long, value_parser = parse_non_empty)]
        summary: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TaskUpdateArgs {
    /// Task ID (e.g., TSK-001)
    #[arg(value_parser = parse_task_id)]
    pub id: String,

    #[arg(long, value_parser = parse_non_empty)]
    pub title: Option<String>,

    #[arg(long, value_parser = parse_non_empty)]
    pub description: Option<String>,

    /// New status; `done` requires --outcome-summary
    #[arg(long, value_parser = ["todo", "doing", "done"])]
    pub status: Option<String>,

    #[arg(short, long, value_parser = parse_priority)]
    pub priority: Option<u8>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long, value_parser = parse_non_empty)]
    pub outcome_summary: Option<String>,

    /// Append an acceptance criterion if not already present (repeatable)
    #[arg(long = "add-acceptance", value_parser = parse_non_empty)]
    pub add_acceptance: Vec<String>,
}

/// Dependency subcommands
#[derive(Subcommand, Debug)]
pub enum DepCommands {
    /// Add a blocks dependency edge (FROM must finish before TO)
    Add {
        /// Blocking task ID
        #[arg(value_parser = parse_task_id)]
        from: String,

        /// Blocked task ID
        #[arg(value_parser = parse_task_id)]
        to: String,
    },

    /// Remove a blocks dependency edge
    Rm {
        #[arg(value_parser = parse_task_id)]
        from: String,

        #[arg(value_parser = parse_task_id)]
        to: String,
    },
}

impl Commands {
    /// Space-separated command path, as used in the action log.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Epic { command } => match command {
                EpicCommands::Create { .. } => "epic create",
                EpicCommands::Show { .. } => "epic show",
                EpicCommands::Update(_) => "epic update",
            },
            Commands::Task { command } => match command {
                TaskCommands::Create { .. } => "task create",
                TaskCommands::Show { .. } => "task show",
                TaskCommands::Update(_) => "task update",
                TaskCommands::Close { .. } => "task close",
            },
            Commands::Dep { command } => match command {
                DepCommands::Add { .. } => "dep add",
                DepCommands::Rm { .. } => "dep rm",
            },
            Commands::Ready { .. } => "ready",
            Commands::Pack { .. } => "pack",
        }
    }
}

/// Every leaf command path with its one-line description, in declaration order.
pub fn command_listing() -> Vec<(String, String)> {
    fn walk(prefix: &str, command: &clap::Command, out: &mut Vec<(String, String)>) {
        for sub in command.get_subcommands() {
            if sub.get_name() == "help" {
                continue;
            }
            let path = if prefix.is_empty() {
                sub.get_name().to_string()
            } else {
                format!("{} {}", prefix, sub.get_name())
            };
            if sub.has_subcommands() {
                walk(&path, sub, out);
            } else {
                let about = sub.get_about().map(|a| a.to_string()).unwrap_or_default();
                out.push((path, about));
            }
        }
    }

    let mut out = Vec::new();
    walk("", &<Cli as clap::CommandFactory>::command(), &mut out);
    out
}

fn parse_non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("value cannot be empty".to_string());
    }
    Ok(value.to_string())
}

fn parse_epic_id(value: &str) -> Result<String, String> {
    validate_epic_id(value).map_err(|e| e.to_string())?;
    Ok(value.to_string())
}

fn parse_task_id(value: &str) -> Result<String, String> {
    validate_task_id(value).map_err(|e| e.to_string())?;
    Ok(value.to_string())
}

fn parse_integer(value: &str) -> Result<i64, String> {
    let text = parse_non_empty(value)?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| "expected integer".to_string())
}

fn parse_priority(value: &str) -> Result<u8, String> {
    let priority = parse_integer(value)?;
    if !(0..=MAX_PRIORITY as i64).contains(&priority) {
        return Err(format!("expected 0..{}", MAX_PRIORITY));
    }
    Ok(priority as u8)
}

fn parse_count(value: &str) -> Result<usize, String> {
    let count = parse_integer(value)?;
    if !(1..=MAX_COUNT as i64).contains(&count) {
        return Err(format!("expected 1..{}", MAX_COUNT));
    }
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("0"), Ok(0));
        assert_eq!(parse_priority("4"), Ok(4));
        assert_eq!(parse_priority("5"), Err("expected 0..4".to_string()));
        assert_eq!(parse_priority("-1"), Err("expected 0..4".to_string()));
        assert_eq!(parse_priority("high"), Err("expected integer".to_string()));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1"), Ok(1));
        assert_eq!(parse_count("20"), Ok(20));
        assert!(parse_count("0").is_err());
        assert!(parse_count("21").is_err());
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_epic_id("EPC-001"), Ok("EPC-001".to_string()));
        assert_eq!(parse_epic_id("bad-id"), Err("Invalid epic id: bad-id".to_string()));
        assert_eq!(parse_task_id("EPC-001"), Err("Invalid task id: EPC-001".to_string()));
    }

    #[test]
    fn test_parse_non_empty() {
        assert!(parse_non_empty("   ").is_err());
        assert_eq!(parse_non_empty(" x "), Ok(" x ".to_string()));
    }

    #[test]
    fn test_global_flags_anywhere() {
        let cli = Cli::try_parse_from(["ananke", "ready", "--json", "--root", "/tmp/ws"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.root.as_deref(), Some(std::path::Path::new("/tmp/ws")));
        assert_eq!(cli.command.unwrap().name(), "ready");
    }

    #[test]
    fn test_command_listing_has_leaf_paths() {
        let listing = command_listing();
        let paths: Vec<&str> = listing.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths.first(), Some(&"init"));
        assert!(paths.contains(&"epic create"));
        assert!(paths.contains(&"task close"));
        assert!(paths.contains(&"dep rm"));
        assert!(paths.contains(&"pack"));
        assert!(!paths.contains(&"epic"));
        assert!(listing.iter().all(|(_, about)| !about.is_empty()));
    }

    #[test]
    fn test_init_update_conflicts_with_reset() {
        assert!(Cli::try_parse_from(["ananke", "init", "--update", "--reset"]).is_err());
    }

    #[test]
    fn test_task_update_args() {
        let cli = Cli::try_parse_from([
            "ananke",
            "task",
            "update",
            "TSK-001",
            "--status",
            "doing",
            "--add-acceptance",
            "a",
            "--add-acceptance",
            "b",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Task {
                command: TaskCommands::Update(args),
            }) => {
                assert_eq!(args.status.as_deref(), Some("doing"));
                assert_eq!(args.add_acceptance, vec!["a", "b"]);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(Cli::try_parse_from(["ananke", "task", "update", "TSK-001", "--status", "blocked"]).is_err());
    }
}
