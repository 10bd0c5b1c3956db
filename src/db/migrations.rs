use rusqlite::Connection;

use crate::error::NerveError;

pub fn run_migrations(conn: &Connection) -> Result<(), NerveError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL,
            name TEXT NOT NULL,
            owner_id TEXT NOT NULL,
            owner_email TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (owner_id, slug)
        );

        CREATE TABLE IF NOT EXISTS checkpoints (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            checkpoint_key TEXT NOT NULL,
            phase INTEGER NOT NULL DEFAULT 0,
            title TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING', 'IN_PROGRESS', 'COMPLETE')),
            estimated_mins INTEGER,
            actual_mins INTEGER NOT NULL DEFAULT 0,
            started_at TEXT,
            completed_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE (project_id, checkpoint_key)
        );

        CREATE TABLE IF NOT EXISTS objectives (
            id TEXT PRIMARY KEY,
            checkpoint_id TEXT NOT NULL REFERENCES checkpoints(id) ON DELETE CASCADE,
            objective_key TEXT NOT NULL,
            title TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING', 'IN_PROGRESS', 'COMPLETE')),
            updated_at TEXT NOT NULL,
            UNIQUE (checkpoint_id, objective_key)
        );

        CREATE TABLE IF NOT EXISTS steps (
            id TEXT PRIMARY KEY,
            objective_id TEXT NOT NULL REFERENCES objectives(id) ON DELETE CASCADE,
            step_key TEXT NOT NULL,
            title TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING', 'IN_PROGRESS', 'COMPLETE')),
            completed_at TEXT,
            updated_at TEXT NOT NULL,
            UNIQUE (objective_id, step_key)
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            checkpoint_id TEXT NOT NULL REFERENCES checkpoints(id) ON DELETE CASCADE,
            started_at TEXT NOT NULL,
            ended_at TEXT,
            duration_mins INTEGER,
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_checkpoints_project ON checkpoints(project_id, phase);
        CREATE INDEX IF NOT EXISTS idx_objectives_checkpoint ON objectives(checkpoint_id, position);
        CREATE INDEX IF NOT EXISTS idx_steps_objective ON steps(objective_id, position);
        CREATE INDEX IF NOT EXISTS idx_sessions_checkpoint ON sessions(checkpoint_id, started_at);
        CREATE INDEX IF NOT EXISTS idx_sessions_open ON sessions(checkpoint_id)
            WHERE ended_at IS NULL;
        ",
    )?;
    Ok(())
}
