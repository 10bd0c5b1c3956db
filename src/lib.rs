pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod output;

/// Build version stamped by `build.rs`.
pub const VERSION: &str = env!("GIT_VERSION");
