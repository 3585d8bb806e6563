//! The chat endpoint: one agent turn, streamed as Server-Sent Events.
//!
//! The cart travels as a side channel: a `cart_items` cookie holding a
//! URL-encoded JSON array of cart lines. It is decoded here, once per
//! request, and handed to the orchestrator; tools never see the raw
//! transport.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive};
use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    response::Sse,
    routing::post,
};
use futures::StreamExt;
use leekspin_core::CartSnapshot;

use crate::error::AppError;
use crate::services::{ChatService, ChatTurnRequest};
use crate::state::AppState;

/// Name of the cart snapshot cookie.
const CART_COOKIE: &str = "cart_items";

/// Build the chat router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat_stream))
}

/// Run one agent turn and stream the response.
///
/// POST /api/chat
///
/// Body: `{messages: [{role, content}]}`. Responds with an SSE stream of
/// framed events (text deltas, tool calls, tool results) ending in a
/// `done` frame, or an `error` frame if the turn fails mid-stream.
/// Failures before streaming starts return a JSON error with a non-2xx
/// status.
async fn chat_stream(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatTurnRequest>,
) -> Result<Sse<impl futures::Stream<Item = Result<Event, Infallible>>>, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::BadRequest("message history is empty".to_string()));
    }

    let cart_token = cart_cookie(&headers);
    let cart = CartSnapshot::decode(cart_token.as_deref());
    if !cart.is_readable() {
        tracing::warn!("Unreadable cart token, degrading to empty cart");
    }

    let service = ChatService::new(&state);
    let event_stream = service.stream_turn(request, cart);

    // Map orchestrator frames to SSE events
    let sse_stream = event_stream.map(|event| {
        let json = serde_json::to_string(&event).unwrap_or_else(|_| {
            r#"{"type":"error","message":"Failed to serialize event","retryable":false}"#
                .to_string()
        });
        Ok(Event::default().data(json))
    });

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

/// Extract the `cart_items` cookie value from the request headers.
fn cart_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == CART_COOKIE).then(|| value.to_string())
    })
}
