use chrono::Utc;
use serde_json::json;

use crate::cli::commands::SessionCommands;
use crate::config::Config;
use crate::db::connection;
use crate::engine;
use crate::error::NerveError;
use crate::output;

pub fn run(cmd: SessionCommands, config: &Config) -> i32 {
    let result = match cmd {
        SessionCommands::Start { project, checkpoint, notes } => {
            run_start(&project, &checkpoint, notes.as_deref(), config)
        }
        SessionCommands::End { project, checkpoint, notes } => {
            run_end(&project, &checkpoint, notes.as_deref(), config)
        }
        SessionCommands::List { project, checkpoint } => run_list(&project, &checkpoint, config),
    };
    super::exit_code(result, config.json_output)
}

fn run_start(slug: &str, checkpoint_key: &str, notes: Option<&str>, config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let started = engine::start_session(&conn, &principal, slug, checkpoint_key, notes, Utc::now())?;

    if config.json_output {
        output::json::print_success(json!(started));
    } else {
        if let Some(ref closed) = started.closed {
            println!(
                "Stopped running session {} ({}min)",
                closed.id,
                closed.duration_mins.unwrap_or(0)
            );
        }
        println!("Started session {} on {checkpoint_key}", started.session.id);
        if started.checkpoint_started {
            println!("  Checkpoint {checkpoint_key} is now IN_PROGRESS");
        }
    }
    Ok(0)
}

fn run_end(slug: &str, checkpoint_key: &str, notes: Option<&str>, config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let session = engine::end_session(&conn, &principal, slug, checkpoint_key, notes, Utc::now())?;

    if config.json_output {
        output::json::print_success(json!(session));
    } else {
        println!(
            "Ended session {} ({}min)",
            session.id,
            session.duration_mins.unwrap_or(0)
        );
    }
    Ok(0)
}

fn run_list(slug: &str, checkpoint_key: &str, config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let sessions = engine::list_sessions(&conn, &principal, slug, checkpoint_key)?;

    if config.json_output {
        output::json::print_success(json!(sessions));
    } else {
        output::text::print_session_list(&sessions);
    }
    Ok(0)
}
