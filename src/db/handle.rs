use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::error::NerveError;

use super::connection;

/// Shared connection for the HTTP server. Work runs on the blocking pool;
/// the mutex serializes access to the single SQLite handle.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self, NerveError> {
        let conn = connection::open_db(path)?;
        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self, NerveError> {
        Ok(Self::from_connection(connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on tokio's blocking pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, NerveError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, NerveError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(|poisoned| {
                let guard = poisoned.into_inner();
                // A request that panicked mid-transaction left it open.
                if !guard.is_autocommit() {
                    tracing::warn!("rolling back transaction left open by a panicked request");
                    if let Err(e) = guard.execute_batch("ROLLBACK") {
                        tracing::error!(error = %e, "rollback after panic failed");
                    }
                }
                guard
            });
            f(&guard)
        })
        .await
        .map_err(|e| NerveError::internal(format!("blocking task failed: {e}")))?
    }

    pub async fn health_check(&self) -> Result<(), NerveError> {
        self.run(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::with_immediate_tx;

    #[tokio::test]
    async fn panic_inside_transaction_does_not_wedge_the_handle() {
        let db = Db::in_memory().unwrap();

        let crashed = db
            .run(|conn| -> Result<(), NerveError> {
                conn.execute_batch("BEGIN IMMEDIATE")?;
                panic!("request handler bug");
            })
            .await;
        assert_eq!(crashed.unwrap_err().code, crate::error::ErrorCode::InternalError);

        let count = db
            .run(|conn| {
                with_immediate_tx(conn, |conn| {
                    conn.execute(
                        "INSERT INTO projects (id, slug, name, owner_id, created_at, updated_at)
                         VALUES ('p1', 'demo', 'Demo', 'u1', '2026-01-01 00:00:00+00:00', '2026-01-01 00:00:00+00:00')",
                        [],
                    )?;
                    Ok(())
                })?;
                Ok(conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get::<_, i64>(0))?)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
