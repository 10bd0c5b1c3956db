pub mod checkpoint;
pub mod commands;
pub mod framework;
pub mod init;
pub mod progress;
pub mod project;
pub mod serve;
pub mod session;

pub use commands::*;

use crate::error::NerveError;
use crate::models::ProgressStatus;
use crate::output;

/// Turn a command result into a process exit code, reporting the error on the
/// channel the caller asked for.
pub(crate) fn exit_code(result: Result<i32, NerveError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<ProgressStatus, NerveError> {
    ProgressStatus::parse_loose(raw).ok_or_else(|| {
        NerveError::validation(format!(
            "Invalid status '{raw}'. Expected pending, in_progress or complete"
        ))
    })
}
