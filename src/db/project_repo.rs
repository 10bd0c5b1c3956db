use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::NerveError;
use crate::models::{Principal, Project};

const PROJECT_COLUMNS: &str = "id, slug, name, owner_id, owner_email, created_at, updated_at";

pub fn create_project(
    conn: &Connection,
    id: &str,
    owner: &Principal,
    slug: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Project, NerveError> {
    if find_owned_project(conn, &owner.user_id, slug)?.is_some() {
        return Err(NerveError::conflict(format!(
            "Project with slug '{slug}' already exists"
        )));
    }

    conn.execute(
        "INSERT INTO projects (id, slug, name, owner_id, owner_email, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![id, slug, name, owner.user_id, owner.email, now],
    )?;

    get_project_by_id(conn, id)
}

pub fn get_project_by_id(conn: &Connection, id: &str) -> Result<Project, NerveError> {
    conn.query_row(
        &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
        params![id],
        row_to_project,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => NerveError::project_not_found(id),
        _ => NerveError::from(e),
    })
}

/// Look up a project by slug, scoped to its owner.
pub fn find_owned_project(
    conn: &Connection,
    owner_id: &str,
    slug: &str,
) -> Result<Option<Project>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = ?1 AND slug = ?2"
    ))?;
    let mut rows = stmt.query(params![owner_id, slug])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_project(row)?)),
        None => Ok(None),
    }
}

/// Resolve a project for the caller. Projects owned by someone else are
/// indistinguishable from missing ones.
pub fn resolve_project(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
) -> Result<Project, NerveError> {
    find_owned_project(conn, &principal.user_id, slug)?
        .ok_or_else(|| NerveError::project_not_found(slug))
}

pub fn list_projects(conn: &Connection, owner_id: &str) -> Result<Vec<Project>, NerveError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let projects = stmt
        .query_map(params![owner_id], row_to_project)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(projects)
}

fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        owner_id: row.get(3)?,
        owner_email: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
