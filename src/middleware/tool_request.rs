use axum::{
    RequestExt,
    body::Bytes,
    extract::{FromRequest, Path, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::DeskError;
use crate::middleware::identity::CallerContext;
use crate::tools::ToolName;

/// Parsed tool invocation: name from the path, caller context, JSON input.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub name: ToolName,
    pub caller: CallerContext,
    pub input: Value,
}

pub struct ToolPreprocess(pub ToolCall);

impl<S> FromRequest<S> for ToolPreprocess
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(mut req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw_name) = match req.extract_parts::<Path<String>>().await {
            Ok(p) => p,
            Err(rejection) => return Err(rejection.into_response()),
        };
        let name: ToolName = raw_name.parse().map_err(DeskError::into_response)?;

        let Ok(caller) = req.extract_parts::<CallerContext>().await;

        let body = match Bytes::from_request(req, &()).await {
            Ok(b) => b,
            Err(rejection) => return Err(rejection.into_response()),
        };
        // An empty body stands for "no arguments".
        let input = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&body)
                .map_err(|e| DeskError::InvalidInput(e.to_string()).into_response())?
        };

        Ok(ToolPreprocess(ToolCall {
            name,
            caller,
            input,
        }))
    }
}
