use serde_json::json;

use crate::config::Config;
use crate::db::connection;
use crate::output;

pub fn run(config: &Config) -> i32 {
    let result = connection::init_db(&config.db_path).map(|path| {
        if config.json_output {
            output::json::print_success(json!({ "path": path.to_string_lossy() }));
        } else {
            println!("Initialized nerve at {}", path.display());
        }
        0
    });
    super::exit_code(result, config.json_output)
}
