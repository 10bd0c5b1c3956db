use chrono::Utc;
use serde_json::json;

use crate::cli::commands::CheckpointCommands;
use crate::config::Config;
use crate::db::connection;
use crate::engine;
use crate::error::NerveError;
use crate::output;

pub fn run(cmd: CheckpointCommands, config: &Config) -> i32 {
    let result = match cmd {
        CheckpointCommands::List { project } => run_list(&project, config),
        CheckpointCommands::Show { project, checkpoint } => run_show(&project, &checkpoint, config),
    };
    super::exit_code(result, config.json_output)
}

fn run_list(slug: &str, config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let checkpoints = engine::list_checkpoints(&conn, &principal, slug)?;

    if config.json_output {
        output::json::print_success(json!(checkpoints));
    } else {
        output::text::print_checkpoint_list(&checkpoints);
    }
    Ok(0)
}

fn run_show(slug: &str, checkpoint_key: &str, config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let detail = engine::checkpoint_detail(&conn, &principal, slug, checkpoint_key, Utc::now())?;

    if config.json_output {
        output::json::print_success(json!(detail));
    } else {
        output::text::print_checkpoint_detail(&detail);
    }
    Ok(0)
}
