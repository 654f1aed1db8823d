use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::action::Action;
use crate::trello::client::Client;
use crate::trello::fetcher::{FetchError, Fetcher};

/// Standard `{ "data": [...] }` envelope for successful responses.
#[derive(Debug, Serialize)]
pub struct DataDocument {
    pub data: Vec<JsonAction>,
}

/// Error envelope: one entry per failure detail.
#[derive(Debug, Serialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub detail: String,
}

/// An action as serialized on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAction {
    /// Required by JSON-API.
    #[serde(rename = "type")]
    kind: &'static str,
    id: String,
    name: String,
    url: String,
    image_url: Option<String>,
    project_name: Option<String>,
    due_by: Option<DateTime<Utc>>,
}

impl From<Action> for JsonAction {
    fn from(action: Action) -> Self {
        Self {
            kind: "actions",
            id: action.id,
            name: action.name,
            url: action.url,
            image_url: action.image_url,
            project_name: action.project_name,
            due_by: action.due_by,
        }
    }
}

pub struct ApiState {
    pub fetcher: Fetcher<Client>,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/actions", get(actions))
        .with_state(state)
}

async fn actions(State(state): State<Arc<ApiState>>) -> Result<Json<DataDocument>, ApiError> {
    let start = std::time::Instant::now();
    let actions = state.fetcher.fetch().await?;
    log::info!(
        "Fetched {} actions in {:?}",
        actions.len(),
        start.elapsed()
    );

    Ok(Json(DataDocument {
        data: actions.into_iter().map(JsonAction::from).collect(),
    }))
}

struct ApiError(FetchError);

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("Fetch failed: {}", self.0);
        let body = ErrorDocument {
            errors: vec![ErrorObject {
                detail: self.0.to_string(),
            }],
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
