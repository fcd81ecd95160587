//! Ananke CLI - durable task memory for AI agents and humans.

use ananke::action_log;
use ananke::cli::{Cli, Commands, DepCommands, EpicCommands, TaskCommands, command_listing};
use ananke::commands::{self, EpicPatch, Output, TaskPatch, failure_human, failure_json};
use ananke::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use ananke::models::pack::PackFormat;
use ananke::storage::{WorkspacePaths, find_workspace_root};
use ananke::{Error, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use serde_json::json;
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostics filter (EnvFilter syntax).
const LOG_ENV: &str = "ANANKE_LOG";

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            _ => {
                // Parsing failed, so only a literal --json can pick the format.
                let json = env::args().any(|arg| arg == "--json");
                fail(&Error::InvalidArgs(clap_message(&e)), json);
            }
        },
    };

    let repo_path = match resolve_repo_path(cli.root) {
        Ok(path) => path,
        Err(e) => fail(&e, cli.json),
    };

    let mut overrides = ConfigOverrides::new();
    if cli.json {
        overrides = overrides.with_output_format(OutputFormat::Json);
    }
    let config = match resolve_config(&repo_path, &overrides) {
        Ok(config) => config,
        Err(e) => fail(&e, cli.json),
    };
    let json = config.output_format() == OutputFormat::Json;

    let Some(command) = cli.command else {
        print_help(json);
        return;
    };

    let (cmd_name, args_json) = serialize_command(&command);
    debug!(command = cmd_name, root = %repo_path.display(), "running command");

    let start = Instant::now();
    let result = run_command(command, &repo_path, &config, json);
    let duration = start.elapsed().as_millis() as u64;

    if config.action_log_enabled() {
        let error = result.as_ref().err().map(|e| e.to_string());
        action_log::log_action(
            &WorkspacePaths::new(&repo_path),
            cmd_name,
            &args_json,
            result.is_ok(),
            error,
            duration,
        );
    }

    if let Err(e) = result {
        fail(&e, json);
    }
}

/// Install the stderr diagnostics subscriber. Quiet (`warn`) unless
/// `ANANKE_LOG` says otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolve the workspace root.
///
/// Priority: --root flag > ANANKE_ROOT env var > nearest ancestor with `.git`
/// > current working directory. An explicit root is made absolute but is not
/// required to exist yet.
fn resolve_repo_path(explicit_path: Option<PathBuf>) -> Result<PathBuf> {
    match explicit_path {
        Some(path) if path.as_os_str().is_empty() => {
            Err(Error::InvalidArgs("Missing value for --root".to_string()))
        }
        Some(path) => Ok(std::path::absolute(path)?),
        None => {
            let cwd = env::current_dir()?;
            Ok(find_workspace_root(&cwd))
        }
    }
}

/// First line of a clap error without its `error: ` prefix.
fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let first = rendered.lines().next().unwrap_or_default().trim();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// Report `error` in the active format and exit with its status.
fn fail(error: &Error, json: bool) -> ! {
    if json {
        println!("{}", failure_json(error));
    } else {
        eprintln!("{}", failure_human(error));
    }
    process::exit(error.exit_code());
}

fn print_help(json: bool) {
    if json {
        let commands: Vec<_> = command_listing()
            .into_iter()
            .map(|(command, description)| json!({ "command": command, "description": description }))
            .collect();
        let payload = json!({ "ok": true, "commands": commands });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        let _ = Cli::command().print_help();
    }
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
        return;
    }
    println!("{}", result.message());
    let body = result.to_human();
    if !body.is_empty() {
        println!("{}", body);
    }
}

fn parse_choice<T: FromStr<Err = String>>(value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| v.parse::<T>())
        .transpose()
        .map_err(Error::InvalidArgs)
}

fn run_command(
    command: Commands,
    repo_path: &Path,
    config: &ResolvedConfig,
    json: bool,
) -> Result<()> {
    match command {
        Commands::Init { update, reset } => {
            output(&commands::init(repo_path, update, reset)?, json);
        }

        Commands::Epic { command } => match command {
            EpicCommands::Create {
                title,
                goal,
                constraints,
                decisions,
                context,
            } => {
                let result =
                    commands::epic_create(repo_path, title, goal, constraints, decisions, context)?;
                output(&result, json);
            }
            EpicCommands::Show { id } => {
                output(&commands::epic_show(repo_path, &id)?, json);
            }
            EpicCommands::Update(args) => {
                let patch = EpicPatch {
                    title: args.title,
                    goal: args.goal,
                    status: parse_choice(args.status)?,
                    context: args.context,
                    digest: args.digest,
                    add_constraints: args.add_constraints,
                    add_decisions: args.add_decisions,
                };
                output(&commands::epic_update(repo_path, &args.id, patch)?, json);
            }
        },

        Commands::Task { command } => match command {
            TaskCommands::Create {
                epic,
                title,
                description,
                priority,
                acceptance,
            } => {
                let priority = priority.unwrap_or_else(|| config.default_priority());
                let result = commands::task_create(
                    repo_path,
                    &epic,
                    title,
                    description,
                    priority,
                    acceptance,
                )?;
                output(&result, json);
            }
            TaskCommands::Show { id } => {
                output(&commands::task_show(repo_path, &id)?, json);
            }
            TaskCommands::Update(args) => {
                let patch = TaskPatch {
                    title: args.title,
                    description: args.description,
                    status: parse_choice(args.status)?,
                    priority: args.priority,
                    notes: args.notes,
                    outcome_summary: args.outcome_summary,
                    add_acceptance: args.add_acceptance,
                };
                output(&commands::task_update(repo_path, &args.id, patch)?, json);
            }
            TaskCommands::Close { id, summary } => {
                output(&commands::task_close(repo_path, &id, summary)?, json);
            }
        },

        Commands::Dep { command } => match command {
            DepCommands::Add { from, to } => {
                output(&commands::dep_add(repo_path, &from, &to)?, json);
            }
            DepCommands::Rm { from, to } => {
                output(&commands::dep_rm(repo_path, &from, &to)?, json);
            }
        },

        Commands::Ready { epic, limit } => {
            output(&commands::ready(repo_path, epic, limit)?, json);
        }

        Commands::Pack {
            id,
            format,
            recent,
            stdout,
        } => {
            let format = PackFormat::from_str(&format).map_err(Error::InvalidArgs)?;
            output(&commands::pack(repo_path, &id, format, recent, stdout)?, json);
        }
    }

    Ok(())
}

/// Command name and arguments as recorded in the action log.
fn serialize_command(command: &Commands) -> (&'static str, serde_json::Value) {
    let args = match command {
        Commands::Init { update, reset } => json!({ "update": update, "reset": reset }),

        Commands::Epic { command } => match command {
            EpicCommands::Create {
                title,
                goal,
                constraints,
                decisions,
                context,
            } => json!({
                "title": title,
                "goal": goal,
                "constraints": constraints,
                "decisions": decisions,
                "context": context,
            }),
            EpicCommands::Show { id } => json!({ "id": id }),
            EpicCommands::Update(args) => json!({
                "id": args.id,
                "title": args.title,
                "goal": args.goal,
                "status": args.status,
                "context": args.context,
                "digest": args.digest,
                "add_constraints": args.add_constraints,
                "add_decisions": args.add_decisions,
            }),
        },

        Commands::Task { command } => match command {
            TaskCommands::Create {
                epic,
                title,
                description,
                priority,
                acceptance,
            } => json!({
                "epic": epic,
                "title": title,
                "description": description,
                "priority": priority,
                "acceptance": acceptance,
            }),
            TaskCommands::Show { id } => json!({ "id": id }),
            TaskCommands::Update(args) => json!({
                "id": args.id,
                "title": args.title,
                "description": args.description,
                "status": args.status,
                "priority": args.priority,
                "notes": args.notes,
                "outcome_summary": args.outcome_summary,
                "add_acceptance": args.add_acceptance,
            }),
            TaskCommands::Close { id, summary } => json!({ "id": id, "summary": summary }),
        },

        Commands::Dep { command } => match command {
            DepCommands::Add { from, to } | DepCommands::Rm { from, to } => {
                json!({ "from": from, "to": to })
            }
        },

        Commands::Ready { epic, limit } => json!({ "epic": epic, "limit": limit }),

        Commands::Pack {
            id,
            format,
            recent,
            stdout,
        } => json!({ "id": id, "format": format, "recent": recent, "stdout": stdout }),
    };

    (command.name(), args)
}
