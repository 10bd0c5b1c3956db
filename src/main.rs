use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nerve::cli::{self, Cli, Commands};
use nerve::config::{Config, ServeConfig};

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli_args = Cli::parse();
    let config = Config::from_cli(&cli_args);

    let default_level = if matches!(cli_args.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    init_tracing(default_level);

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&config),
        Commands::Serve { host, port } => cli::serve::run(ServeConfig { host, port }, &config),
        Commands::Project(cmd) => cli::project::run(cmd, &config),
        Commands::Framework(cmd) => cli::framework::run(cmd, &config),
        Commands::Checkpoint(cmd) => cli::checkpoint::run(cmd, &config),
        Commands::Objective(cmd) => cli::progress::run_objective(cmd, &config),
        Commands::Step(cmd) => cli::progress::run_step(cmd, &config),
        Commands::Session(cmd) => cli::session::run(cmd, &config),
    };

    process::exit(exit_code);
}
