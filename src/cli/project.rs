use chrono::Utc;
use serde_json::json;

use crate::cli::commands::ProjectCommands;
use crate::config::Config;
use crate::db::connection;
use crate::engine;
use crate::error::NerveError;
use crate::output;

pub fn run(cmd: ProjectCommands, config: &Config) -> i32 {
    let result = match cmd {
        ProjectCommands::Create { slug, name } => run_create(&slug, name.as_deref(), config),
        ProjectCommands::List => run_list(config),
    };
    super::exit_code(result, config.json_output)
}

fn run_create(slug: &str, name: Option<&str>, config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let project = engine::create_project(&conn, &principal, slug, name, Utc::now())?;

    if config.json_output {
        output::json::print_success(json!(project));
    } else {
        println!("Created project: {} ({})", project.slug, project.id);
    }
    Ok(0)
}

fn run_list(config: &Config) -> Result<i32, NerveError> {
    let principal = config.principal()?;
    let conn = connection::open_db(&config.db_path)?;
    let projects = engine::list_projects(&conn, &principal)?;

    if config.json_output {
        output::json::print_success(json!(projects));
    } else {
        output::text::print_project_list(&projects);
    }
    Ok(0)
}
