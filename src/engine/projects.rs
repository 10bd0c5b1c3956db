use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::db::project_repo;
use crate::error::NerveError;
use crate::models::{Principal, Project};

pub fn validate_slug(slug: &str) -> Result<(), NerveError> {
    if !is_slug(slug) {
        return Err(NerveError::validation(
            "Project slug must match ^[a-z0-9][a-z0-9-]*[a-z0-9]$ (or single char [a-z0-9])",
        ));
    }
    Ok(())
}

fn is_slug(slug: &str) -> bool {
    let edge_ok = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    let (Some(first), Some(last)) = (slug.chars().next(), slug.chars().last()) else {
        return false;
    };
    edge_ok(first) && edge_ok(last) && slug.chars().all(|c| edge_ok(c) || c == '-')
}

/// Create a project owned by `principal`. The name defaults to the slug.
pub fn create_project(
    conn: &Connection,
    principal: &Principal,
    slug: &str,
    name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Project, NerveError> {
    validate_slug(slug)?;
    let id = ulid::Ulid::new().to_string();
    let project = project_repo::create_project(conn, &id, principal, slug, name.unwrap_or(slug), now)?;
    tracing::info!(project = %project.slug, owner = %principal.user_id, "project created");
    Ok(project)
}

pub fn list_projects(conn: &Connection, principal: &Principal) -> Result<Vec<Project>, NerveError> {
    project_repo::list_projects(conn, &principal.user_id)
}
