use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nerve",
    version = crate::VERSION,
    about = "Checkpoint progress tracking for consulting projects",
    after_help = "\
NOTE:
  The database lives at ./.nerve/nerve.db unless --db / NERVE_DB says otherwise.
  Run `nerve init` before any other command.
  Every project command acts on behalf of --user / NERVE_USER.

EXIT CODES:
  0  Success
  1  Error (not found, validation, no active session, DB, etc.)

CASCADE RULES:
  Completing the last open step of an objective completes the objective.
  Completing the last open objective of a checkpoint completes the checkpoint,
  stops its running session and re-sums its actual minutes.
  Reopening a step never demotes a completed objective or checkpoint."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Database file
    #[arg(long, global = true, env = "NERVE_DB")]
    pub db: Option<PathBuf>,

    /// Acting user id
    #[arg(long, global = true, env = "NERVE_USER")]
    pub user: Option<String>,

    /// Acting user email
    #[arg(long, global = true, env = "NERVE_EMAIL")]
    pub email: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database (idempotent)
    Init,

    /// Run the HTTP API
    Serve {
        #[arg(long, env = "NERVE_HOST", default_value = "127.0.0.1")]
        host: String,
        #[arg(long, env = "NERVE_PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Checkpoint framework seeding
    #[command(subcommand)]
    Framework(FrameworkCommands),

    /// Checkpoint progress views
    #[command(subcommand)]
    Checkpoint(CheckpointCommands),

    /// Objective status
    #[command(subcommand)]
    Objective(ObjectiveCommands),

    /// Step status
    #[command(subcommand)]
    Step(StepCommands),

    /// Work sessions (timers) on a checkpoint
    #[command(subcommand)]
    Session(SessionCommands),
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a project
    Create {
        /// Project slug (lowercase alphanumeric with hyphens)
        slug: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// List your projects
    List,
}

#[derive(Subcommand)]
pub enum FrameworkCommands {
    /// Load a checkpoint tree from stdin JSON
    #[command(after_help = "\
STDIN FORMAT:
  {\"checkpoints\":[{\"checkpointId\":\"CP1\", \"phase\":1, \"title\":\"...\",
    \"objectives\":[{\"objectiveId\":\"OB1\", \"steps\":[{\"stepId\":\"S1\"}]}]}]}

NOTE:
  Atomic: all-or-nothing. Keys must be unique under their parent.
  A checkpointId that already exists in the project is rejected.")]
    Load {
        /// Project slug
        project: String,
    },
}

#[derive(Subcommand)]
pub enum CheckpointCommands {
    /// List checkpoints with progress
    List {
        /// Project slug
        project: String,
    },
    /// Show a checkpoint tree
    Show {
        /// Project slug
        project: String,
        /// Checkpoint id
        checkpoint: String,
    },
}

#[derive(Subcommand)]
pub enum ObjectiveCommands {
    /// Set an objective's status (steps are not consulted)
    Set {
        project: String,
        checkpoint: String,
        objective: String,
        /// pending | in_progress | complete
        status: String,
    },
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Set a step's status and cascade completion upward
    Set {
        project: String,
        checkpoint: String,
        objective: String,
        step: String,
        /// pending | in_progress | complete
        status: String,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a session (stops a running one first)
    Start {
        project: String,
        checkpoint: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Stop the running session
    End {
        project: String,
        checkpoint: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List sessions, newest first
    List {
        project: String,
        checkpoint: String,
    },
}
