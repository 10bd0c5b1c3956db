use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::NerveError;

use super::migrations;

/// Open an existing database. Returns error if not initialized.
pub fn open_db(path: &Path) -> Result<Connection, NerveError> {
    if !path.exists() {
        return Err(NerveError::not_initialized(&path.to_string_lossy()));
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    // Older databases pick up new tables without a separate step.
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db(path: &Path) -> Result<PathBuf, NerveError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| NerveError::database(e.to_string()))?;
        }
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(path.to_path_buf())
}

/// Fresh, migrated in-memory database.
pub fn open_in_memory() -> Result<Connection, NerveError> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Run `f` inside `BEGIN IMMEDIATE`; commit on success, roll back on error.
///
/// The immediate lock is taken before the first read, so two cascades on the
/// same database never interleave their read-modify-write sequences.
pub fn with_immediate_tx<T, F>(conn: &Connection, f: F) -> Result<T, NerveError>
where
    F: FnOnce(&Connection) -> Result<T, NerveError>,
{
    conn.execute_batch("BEGIN IMMEDIATE")?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                tracing::error!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

fn configure_connection(conn: &Connection) -> Result<(), NerveError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_requires_init() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.db");
        let err = open_db(&path).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotInitialized);
    }

    #[test]
    fn init_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".nerve").join("nerve.db");
        init_db(&path).unwrap();
        assert!(path.exists());
        open_db(&path).unwrap();
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let conn = open_in_memory().unwrap();
        let result: Result<(), NerveError> = with_immediate_tx(&conn, |conn| {
            conn.execute(
                "INSERT INTO projects (id, slug, name, owner_id, created_at, updated_at)
                 VALUES ('p1', 'demo', 'Demo', 'u1', '2026-01-01 00:00:00+00:00', '2026-01-01 00:00:00+00:00')",
                [],
            )?;
            Err(NerveError::validation("boom"))
        });
        assert!(result.is_err());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
