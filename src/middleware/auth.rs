use axum::RequestPartsExt;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::DeskError;

pub const DESK_KEY_HEADER: &str = "x-desk-key";

/// Service key every tool call must present.
#[derive(Clone)]
pub struct DeskKey(pub Arc<str>);

impl DeskKey {
    fn matches(&self, candidate: &str) -> bool {
        bool::from(candidate.as_bytes().ct_eq(self.0.as_bytes()))
    }
}

/// Ensure the inbound request is authorized.
/// Accepts either:
/// - Header: `x-desk-key: ...`
/// - Header: `Authorization: Bearer ...`
/// - Query string: `?key=...`
pub fn ensure_authorized(
    expected: &DeskKey,
    headers: &HeaderMap,
    bearer: Option<&str>,
    query: Option<&str>,
) -> Result<(), DeskError> {
    if let Some(hv) = headers.get(DESK_KEY_HEADER).and_then(|v| v.to_str().ok())
        && expected.matches(hv)
    {
        return Ok(());
    }

    if let Some(token) = bearer
        && expected.matches(token)
    {
        return Ok(());
    }

    if let Some(qs) = query {
        for (k, v) in url::form_urlencoded::parse(qs.as_bytes()) {
            if k == "key" && expected.matches(&v) {
                return Ok(());
            }
        }
    }

    Err(DeskError::Unauthorized)
}

#[derive(Debug, Clone, Copy)]
pub struct RequireKeyAuth;

impl<S> FromRequestParts<S> for RequireKeyAuth
where
    DeskKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = DeskError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let expected = DeskKey::from_ref(state);
        let bearer = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok()
            .map(|TypedHeader(auth)| auth.token().to_string());
        let query = parts.uri.query();
        ensure_authorized(&expected, &parts.headers, bearer.as_deref(), query)?;
        Ok(Self)
    }
}
