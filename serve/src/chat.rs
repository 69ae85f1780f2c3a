//! `POST /api/chat`: one completion per request.
//!
//! Success is `200 {"content": ...}`. Every failure (unparseable body, empty message
//! list, upstream error) is `500 {"error": "Failed to process request", "details": ...}`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley::{CompletionRequest, CompletionResponse, ErrorResponse};
use tracing::{debug, warn};

use crate::app::AppState;

fn failure(details: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::failed(details)),
    )
        .into_response()
}

pub(crate) async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompletionRequest>, JsonRejection>,
) -> Response {
    let response = match payload {
        Err(rejection) => {
            warn!("chat request rejected: {}", rejection.body_text());
            failure(rejection.body_text())
        }
        Ok(Json(request)) => {
            debug!(message_count = request.messages.len(), "chat request");
            match state.gateway.complete(&request.messages).await {
                Ok(content) => (StatusCode::OK, Json(CompletionResponse { content })).into_response(),
                Err(e) => {
                    warn!("chat request failed: {}", e);
                    failure(e.details())
                }
            }
        }
    };
    state.signal_done();
    response
}
