use chrono::Utc;
use serde_json::json;

use crate::cli::commands::{ObjectiveCommands, StepCommands};
use crate::config::Config;
use crate::db::connection;
use crate::engine;
use crate::error::NerveError;
use crate::output;

pub fn run_step(cmd: StepCommands, config: &Config) -> i32 {
    let result = match cmd {
        StepCommands::Set { project, checkpoint, objective, step, status } => {
            run_step_set(&project, &checkpoint, &objective, &step, &status, config)
        }
    };
    super::exit_code(result, config.json_output)
}

pub fn run_objective(cmd: ObjectiveCommands, config: &Config) -> i32 {
    let result = match cmd {
        ObjectiveCommands::Set { project, checkpoint, objective, status } => {
            run_objective_set(&project, &checkpoint, &objective, &status, config)
        }
    };
    super::exit_code(result, config.json_output)
}

fn run_step_set(
    slug: &str,
    checkpoint_key: &str,
    objective_key: &str,
    step_key: &str,
    status: &str,
    config: &Config,
) -> Result<i32, NerveError> {
    let status = super::parse_status(status)?;
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let update = engine::set_step_status(
        &conn,
        &principal,
        slug,
        checkpoint_key,
        objective_key,
        step_key,
        status,
        Utc::now(),
    )?;

    if config.json_output {
        output::json::print_success(json!(update));
    } else {
        println!("Step {} → {}", update.step.key, update.step.status.as_str());
        if update.objective_completed {
            println!("  Objective {objective_key} complete");
        }
        if update.checkpoint_completed {
            println!("  Checkpoint {checkpoint_key} complete");
        }
    }
    Ok(0)
}

fn run_objective_set(
    slug: &str,
    checkpoint_key: &str,
    objective_key: &str,
    status: &str,
    config: &Config,
) -> Result<i32, NerveError> {
    let status = super::parse_status(status)?;
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let update = engine::set_objective_status(
        &conn,
        &principal,
        slug,
        checkpoint_key,
        objective_key,
        status,
        Utc::now(),
    )?;

    if config.json_output {
        output::json::print_success(json!(update));
    } else {
        let ob = &update.objective.objective;
        println!("Objective {} → {}", ob.key, ob.status.as_str());
        if update.checkpoint_completed {
            println!("  Checkpoint {checkpoint_key} complete");
        }
    }
    Ok(0)
}
