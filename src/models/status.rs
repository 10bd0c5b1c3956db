use serde::{Deserialize, Serialize};

/// Shared by checkpoints, objectives and steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressStatus {
    Pending,
    InProgress,
    Complete,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Complete => "COMPLETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETE" => Some(Self::Complete),
            _ => None,
        }
    }

    /// Accepts `pending`, `in-progress`, `In_Progress`, `COMPLETE`, ...
    pub fn parse_loose(s: &str) -> Option<Self> {
        Self::from_str(&s.trim().to_ascii_uppercase().replace('-', "_"))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}
