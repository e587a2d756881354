use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use socratic_core::{AskReply, AskRequest, Turn};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::session_cookie;
use crate::state::AppState;

pub const DEFAULT_SUBJECT: &str = "general";
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tutor/ask", post(ask))
        .route("/tutor/history", get(history))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct AskParams {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub subject: Option<String>,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Always 200; failures are reported through `success: false`.
/// JSON bodies are read as JSON, anything else as a urlencoded form.
async fn ask(State(state): State<AppState>, request: Request) -> Response {
    let session_id = session_cookie::read(request.headers());
    let params = match read_ask_params(request).await {
        Ok(params) => params,
        Err(reason) => {
            tracing::warn!(error = %reason, "rejected tutor request body");
            return Json(AskReply::failed(reason)).into_response();
        }
    };

    let mut request = AskRequest::new(params.question, params.subject);
    request.session_id = session_id;

    let outcome = state.tutor.ask(request).await;
    let mut response = Json(outcome.reply).into_response();
    if outcome.session_created {
        session_cookie::issue(response.headers_mut(), &outcome.session_id);
    }
    response
}

async fn read_ask_params(request: Request) -> Result<AskParams, String> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        Json::<AskParams>::from_request(request, &())
            .await
            .map(|Json(params)| params)
            .map_err(|rejection| rejection.body_text())
    } else {
        Form::<AskParams>::from_request(request, &())
            .await
            .map(|Form(params)| params)
            .map_err(|rejection| rejection.body_text())
    }
}

async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<Turn>>, ServerError> {
    let Some(session_id) = session_cookie::read(&headers) else {
        return Ok(Json(Vec::new()));
    };
    let subject = params
        .subject
        .filter(|subject| !subject.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

    let turns = state.tutor.history(&session_id, &subject).await?;
    Ok(Json(turns))
}
