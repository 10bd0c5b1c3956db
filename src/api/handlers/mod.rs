//! Request handlers, one per resource and verb.

mod checkpoints;
mod health;
mod projects;
mod sessions;

pub use checkpoints::{get_checkpoint, list_checkpoints, load_framework, update_objective, update_step};
pub use health::health;
pub use projects::{create_project, list_projects};
pub use sessions::{end_session, list_sessions, start_session};
