//! CLI argument definitions for tm.

use crate::commands::BlueprintField;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TM_GIT_COMMIT"),
    ", built ",
    env!("TM_BUILD_TIMESTAMP"),
    ")"
);

/// tm - metadata engine for AI task manager plans and tasks.
///
/// Every command prints a single result on stdout. Diagnostics go to stderr;
/// set TM_DEBUG=1 for step-by-step traces.
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, long_version = LONG_VERSION, about = "Resolve, number and update task manager plans and tasks", long_about = None)]
pub struct Cli {
    /// Output JSON instead of plain text
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if tm was started in <DIR> instead of the current directory.
    /// Can also be set via TM_DIR environment variable.
    #[arg(short = 'C', long = "dir", global = true, env = crate::config::DIR_ENV)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the next free plan ID
    NextPlanId,

    /// Print the next free task ID within a plan
    NextTaskId {
        /// Plan ID (any zero padding) or path to the plan document
        plan: String,
    },

    /// Print plan file, directory, task count and blueprint presence
    Blueprint {
        /// Plan ID (any zero padding) or path to the plan document
        plan: String,

        /// Print only this field
        #[arg(value_enum)]
        field: Option<BlueprintField>,
    },

    /// Set the approval_method field of a plan document
    SetApproval {
        /// Path to the plan document
        path: PathBuf,

        /// "auto" or "manual"
        mode: String,
    },

    /// Set the status field of a task document
    SetStatus {
        /// Path to the task document
        path: PathBuf,

        /// pending, in-progress, completed or needs-clarification
        status: String,
    },

    /// List all plans in the active and archived areas
    Plans,

    /// Print the parsed header of a document
    Header {
        /// Path to the document
        path: PathBuf,

        /// Print only this field
        key: Option<String>,
    },

    /// Move an active plan into the archive
    Archive {
        /// Plan ID (any zero padding) or path to the plan document
        plan: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_blueprint_field() {
        let cli = Cli::try_parse_from(["tm", "blueprint", "02", "taskCount"]).unwrap();
        match cli.command {
            Commands::Blueprint { plan, field } => {
                assert_eq!(plan, "02");
                assert_eq!(field, Some(BlueprintField::TaskCount));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_blueprint_field() {
        assert!(Cli::try_parse_from(["tm", "blueprint", "1", "owner"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tm", "next-plan-id", "--json", "-C", "/tmp"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp")));
    }
}
