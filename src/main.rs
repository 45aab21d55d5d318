//! tm CLI - metadata engine for AI task manager plans and tasks.

use clap::Parser;
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use taskmeta::cli::{Cli, Commands};
use taskmeta::commands::{self, Output};
use taskmeta::config;
use taskmeta::models::PlanRef;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging();

    let json = cli.json;
    let start = resolve_start_dir(cli.dir, json);

    if let Err(e) = run_command(cli.command, &start, json) {
        tracing::debug!(error = ?e, "command failed");
        if json {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        } else {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

/// Send traces to stderr. TM_DEBUG wins over RUST_LOG; the default is warn.
fn init_logging() {
    let default_level = "warn";
    let filter = if config::debug_enabled() {
        EnvFilter::new("taskmeta=debug,tm=debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// Start directory: --dir flag > TM_DIR env > current working directory.
fn resolve_start_dir(explicit: Option<PathBuf>, json: bool) -> PathBuf {
    match explicit {
        Some(path) => {
            if !path.is_dir() {
                let message = format!("Specified directory does not exist: {}", path.display());
                if json {
                    eprintln!("{}", serde_json::json!({ "error": message }));
                } else {
                    eprintln!("Error: {}", message);
                }
                process::exit(1);
            }
            path
        }
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn run_command(command: Commands, start: &Path, json: bool) -> Result<(), taskmeta::Error> {
    match command {
        Commands::NextPlanId => output(&commands::next_plan_id(start)?, json),

        Commands::NextTaskId { plan } => {
            let plan: PlanRef = plan.parse()?;
            output(&commands::next_task_id(start, &plan)?, json);
        }

        Commands::Blueprint { plan, field } => {
            let plan: PlanRef = plan.parse()?;
            let blueprint = commands::blueprint(start, &plan)?;
            match field {
                Some(field) => output(&blueprint.field(field), json),
                None => output(&blueprint, json),
            }
        }

        Commands::SetApproval { path, mode } => {
            output(&commands::set_approval(start, &path, &mode)?, json)
        }

        Commands::SetStatus { path, status } => {
            output(&commands::set_status(start, &path, &status)?, json)
        }

        Commands::Plans => output(&commands::list_plans(start)?, json),

        Commands::Header { path, key } => match key {
            Some(key) => output(&commands::header_field(start, &path, &key)?, json),
            None => output(&commands::show_header(start, &path)?, json),
        },

        Commands::Archive { plan } => {
            let plan: PlanRef = plan.parse()?;
            output(&commands::archive(start, &plan)?, json);
        }
    }
    Ok(())
}

fn output<T: Output>(result: &T, json: bool) {
    if json {
        println!("{}", result.to_json());
    } else {
        println!("{}", result.to_human());
    }
}
