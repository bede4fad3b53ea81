//! Caller identity.
//!
//! Authentication happens upstream. The gateway forwards the verified user id
//! in the `X-User-Id` header and this extractor only parses it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::web::error::ApiError;

/// Header carrying the verified user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Verified id of the calling user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| ApiError::unauthorized("missing user identity"))?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(UserId)
            .ok_or_else(|| ApiError::unauthorized("invalid user identity"))
    }
}
