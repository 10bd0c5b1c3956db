//! Request bodies. Fields are optional at the serde level so that missing
//! fields surface as validation errors with a readable message.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::NerveError;
use crate::models::ProgressStatus;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub slug: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateObjectiveRequest {
    pub objective_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStepRequest {
    pub objective_id: Option<String>,
    pub step_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub notes: Option<String>,
}

impl CreateProjectRequest {
    pub fn validate(self) -> Result<(String, Option<String>), NerveError> {
        Ok((required("slug", self.slug)?, self.name))
    }
}

impl UpdateObjectiveRequest {
    pub fn validate(self) -> Result<(String, ProgressStatus), NerveError> {
        Ok((
            required("objectiveId", self.objective_id)?,
            parse_status(self.status)?,
        ))
    }
}

impl UpdateStepRequest {
    pub fn validate(self) -> Result<(String, String, ProgressStatus), NerveError> {
        Ok((
            required("objectiveId", self.objective_id)?,
            required("stepId", self.step_id)?,
            parse_status(self.status)?,
        ))
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, NerveError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| NerveError::validation(format!("{field} is required")))
}

pub fn parse_status(value: Option<String>) -> Result<ProgressStatus, NerveError> {
    let raw = required("status", value)?;
    ProgressStatus::parse_loose(&raw).ok_or_else(|| {
        NerveError::validation(format!(
            "Invalid status '{raw}'. Expected PENDING, IN_PROGRESS or COMPLETE"
        ))
    })
}

/// Parse a body that may be absent altogether.
pub fn optional_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, NerveError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| NerveError::validation(format!("Invalid request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_request_requires_every_field() {
        let req = UpdateStepRequest {
            objective_id: Some("OB1".into()),
            step_id: None,
            status: Some("COMPLETE".into()),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.message, "stepId is required");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = parse_status(Some("DONE".into())).unwrap_err();
        assert!(err.message.contains("Invalid status 'DONE'"));
    }

    #[test]
    fn empty_body_defaults() {
        let req: SessionRequest = optional_body(b"").unwrap();
        assert!(req.notes.is_none());
        let req: SessionRequest = optional_body(br#"{"notes":"pairing"}"#).unwrap();
        assert_eq!(req.notes.as_deref(), Some("pairing"));
        assert!(optional_body::<SessionRequest>(b"{oops").is_err());
    }
}
