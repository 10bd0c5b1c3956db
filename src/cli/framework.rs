use std::io::{self, Read};

use chrono::Utc;
use serde_json::json;

use crate::cli::commands::FrameworkCommands;
use crate::config::Config;
use crate::db::connection;
use crate::engine::{self, FrameworkInput};
use crate::error::NerveError;
use crate::output;

pub fn run(cmd: FrameworkCommands, config: &Config) -> i32 {
    let result = match cmd {
        FrameworkCommands::Load { project } => run_load(&project, config),
    };
    super::exit_code(result, config.json_output)
}

fn run_load(slug: &str, config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;

    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| NerveError::validation(format!("Failed to read stdin: {e}")))?;
    let input: FrameworkInput = serde_json::from_str(&raw)
        .map_err(|e| NerveError::validation(format!("Invalid JSON: {e}")))?;

    let conn = connection::open_db(&config.db_path)?;
    let created = engine::load_framework(&conn, &principal, slug, &input, Utc::now())?;

    if config.json_output {
        output::json::print_success(json!({
            "project": slug,
            "checkpointsCreated": created.len(),
            "checkpoints": created,
        }));
    } else {
        println!("Loaded {} checkpoint(s) into {slug}", created.len());
        for cp in &created {
            println!("  {} (phase {}) {}", cp.key, cp.phase, cp.title);
        }
    }
    Ok(0)
}
