use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::convert::Infallible;

use crate::error::DeskError;
use crate::types::tools::UserProfile;

/// Header the fronting identity provider sets after authenticating the caller.
/// Value: base64url (padding optional) JSON `{id, name, avatar, email}`.
pub const USER_CONTEXT_HEADER: &str = "x-user-context";

/// Raw identity context, decoded only by tools that need a caller.
#[derive(Debug, Clone, Default)]
pub struct CallerContext(pub Option<String>);

impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_CONTEXT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(Self(raw))
    }
}

impl CallerContext {
    pub fn resolve(&self) -> Result<UserProfile, DeskError> {
        let raw = self.0.as_deref().ok_or(DeskError::Unauthenticated)?;
        decode_user_context(raw)
    }
}

pub fn encode_user_context(user: &UserProfile) -> Result<String, DeskError> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(user)?))
}

fn decode_user_context(raw: &str) -> Result<UserProfile, DeskError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(raw.trim().trim_end_matches('='))
        .map_err(|_| DeskError::Unauthenticated)?;
    let user: UserProfile =
        serde_json::from_slice(&decoded).map_err(|_| DeskError::Unauthenticated)?;
    if user.id.trim().is_empty() {
        return Err(DeskError::Unauthenticated);
    }
    Ok(user)
}
