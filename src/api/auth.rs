use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::NerveError;
use crate::models::Principal;

pub const USER_ID_HEADER: &str = "x-nerve-user-id";
pub const USER_EMAIL_HEADER: &str = "x-nerve-user-email";

/// The authenticated caller. Rejects with 401 when the identity headers are
/// missing or empty.
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = NerveError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let user_id = header(USER_ID_HEADER).ok_or_else(NerveError::unauthorized)?;
        Ok(Caller(Principal::new(user_id, header(USER_EMAIL_HEADER))))
    }
}
