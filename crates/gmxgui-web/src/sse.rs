//! Server-Sent Events (SSE) streaming for live dashboard updates.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::extract::State;
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::{AppEvent, SharedState};

fn to_sse(event: &AppEvent) -> Option<Event> {
    // Unnamed events, so the page's `onmessage` handler sees every one
    match Event::default().json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            tracing::warn!("Dropping unserializable event {:?}: {}", event, e);
            None
        }
    }
}

/// SSE endpoint. The dashboard page reloads on every event it receives here.
/// The stream ends when the server begins shutting down, so open tabs never
/// hold up a graceful stop.
pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();
    let events = BroadcastStream::new(rx)
        .filter_map(|result| {
            // Lagged receivers skip the missed events
            result.ok().and_then(|event| to_sse(&event)).map(Ok)
        });
    let stream = futures_util::StreamExt::take_until(events, state.shutdown_handle().wait());

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
