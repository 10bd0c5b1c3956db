pub mod connection;
pub mod handle;
pub mod migrations;
pub mod project_repo;
pub mod checkpoint_repo;
pub mod objective_repo;
pub mod step_repo;
pub mod session_repo;

pub use connection::*;
pub use handle::Db;
