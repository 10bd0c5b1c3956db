use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::cli::commands::Cli;
use crate::error::NerveError;
use crate::models::Principal;

/// Default database location, relative to the working directory.
pub fn default_db_path() -> PathBuf {
    PathBuf::from(".nerve").join("nerve.db")
}

/// Settings shared by every command, gathered from flags and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub user: Option<String>,
    pub email: Option<String>,
    pub json_output: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            db_path: cli.db.clone().unwrap_or_else(default_db_path),
            user: cli.user.clone().filter(|u| !u.trim().is_empty()),
            email: cli.email.clone(),
            json_output: cli.json,
        }
    }

    /// The acting user, or `Unauthorized` when none was given.
    pub fn principal(&self) -> Result<Principal, NerveError> {
        let user = self.user.as_deref().ok_or_else(NerveError::unauthorized)?;
        Ok(Principal::new(user, self.email.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

impl ServeConfig {
    /// Listen addresses for `host:port`. Host names are resolved.
    pub fn addrs(&self) -> Result<Vec<SocketAddr>, NerveError> {
        let invalid = |detail: String| {
            NerveError::validation(format!(
                "Invalid listen address {}:{}: {detail}",
                self.host, self.port
            ))
        };
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .collect();
        if addrs.is_empty() {
            return Err(invalid("host resolved to no address".into()));
        }
        Ok(addrs)
    }
}
