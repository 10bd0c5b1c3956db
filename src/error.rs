use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    Unauthorized,
    ProjectNotFound,
    CheckpointNotFound,
    ObjectiveNotFound,
    StepNotFound,
    NoActiveSession,
    ValidationError,
    Conflict,
    DatabaseError,
    InternalError,
}

/// Coarse classification used by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    InvalidState,
    Unauthorized,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::CheckpointNotFound => "CHECKPOINT_NOT_FOUND",
            Self::ObjectiveNotFound => "OBJECTIVE_NOT_FOUND",
            Self::StepNotFound => "STEP_NOT_FOUND",
            Self::NoActiveSession => "NO_ACTIVE_SESSION",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound
            | Self::CheckpointNotFound
            | Self::ObjectiveNotFound
            | Self::StepNotFound => ErrorKind::NotFound,
            Self::ValidationError => ErrorKind::InvalidInput,
            Self::NoActiveSession => ErrorKind::InvalidState,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Conflict => ErrorKind::Conflict,
            Self::NotInitialized | Self::DatabaseError | Self::InternalError => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct NerveError {
    pub code: ErrorCode,
    pub message: String,
}

impl NerveError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    pub fn not_initialized(path: &str) -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            format!("No database at {path}. Run `nerve init` first."),
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::Unauthorized, "Unauthorized")
    }

    pub fn project_not_found(slug: &str) -> Self {
        Self::new(
            ErrorCode::ProjectNotFound,
            format!("Project not found: {slug}"),
        )
    }

    pub fn checkpoint_not_found(key: &str) -> Self {
        Self::new(
            ErrorCode::CheckpointNotFound,
            format!("Checkpoint not found: {key}"),
        )
    }

    pub fn objective_not_found(key: &str) -> Self {
        Self::new(
            ErrorCode::ObjectiveNotFound,
            format!("Objective not found: {key}"),
        )
    }

    pub fn step_not_found(key: &str) -> Self {
        Self::new(ErrorCode::StepNotFound, format!("Step not found: {key}"))
    }

    pub fn no_active_session() -> Self {
        Self::new(ErrorCode::NoActiveSession, "No active session")
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<rusqlite::Error> for NerveError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}
