pub mod auth;
pub mod identity;
pub mod tool_request;
