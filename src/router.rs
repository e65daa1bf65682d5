use crate::db::{PassengerStore, SqlitePool, TodoStore};
use crate::middleware::auth::{DeskKey, RequireKeyAuth};
use crate::service::generator::TitleGenerator;
use crate::service::passengers::PassengerOps;
use crate::service::todos::TodoOps;
use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

/// CSV imports arrive inline in the JSON body.
const MAX_TOOL_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Clone)]
pub struct DeskState {
    pub todos: TodoOps,
    pub passengers: PassengerOps,
    pub desk_key: DeskKey,
}

impl DeskState {
    pub fn new(pool: SqlitePool, generator: Arc<dyn TitleGenerator>, desk_key: Arc<str>) -> Self {
        Self {
            todos: TodoOps::new(TodoStore::new(pool.clone()), generator),
            passengers: PassengerOps::new(PassengerStore::new(pool)),
            desk_key: DeskKey(desk_key),
        }
    }
}

impl FromRef<DeskState> for DeskKey {
    fn from_ref(state: &DeskState) -> Self {
        state.desk_key.clone()
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn desk_router(state: DeskState) -> Router {
    use crate::handlers::tools::{list_tools_handler, tool_handler};

    let require_key = middleware::from_extractor_with_state::<RequireKeyAuth, _>(state.clone());
    let tools = Router::new()
        .route("/tools", get(list_tools_handler))
        .route("/tools/{name}", post(tool_handler))
        .layer(require_key)
        .layer(DefaultBodyLimit::max(MAX_TOOL_BODY_BYTES));

    Router::new()
        .route("/healthz", get(health_handler))
        .merge(tools)
        .fallback(not_found_handler)
        .with_state(state)
}
