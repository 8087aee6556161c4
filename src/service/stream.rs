use std::time::Duration;

use futures_util::{stream, Stream, StreamExt};
use tracing::debug;

use crate::models::{StreamEvent, StreamEventKind};

/// Default pause between emitted events.
pub const DEFAULT_EVENT_DELAY: Duration = Duration::from_millis(500);

/// The fixed progress sequence sent for every run.
pub const RUN_EVENTS: [StreamEvent; 3] = [
    StreamEvent {
        kind: StreamEventKind::Start,
        message: "Starting process...",
    },
    StreamEvent {
        kind: StreamEventKind::Progress,
        message: "Processing...",
    },
    StreamEvent {
        kind: StreamEventKind::Complete,
        message: "Complete!",
    },
];

/// Lazily yield [`RUN_EVENTS`], sleeping `delay` before every event after the first.
///
/// Nothing runs until the stream is polled, and dropping it mid-way (for example
/// when the client disconnects) abandons the remaining events.
pub fn run_events(delay: Duration) -> impl Stream<Item = StreamEvent> + Send + 'static {
    stream::iter(RUN_EVENTS.into_iter().enumerate()).then(move |(idx, event)| async move {
        if idx > 0 {
            tokio::time::sleep(delay).await;
        }
        event
    })
}

/// [`run_events`] encoded as `data: <json>\n\n` frames.
pub fn run_frames(
    thread_id: String,
    delay: Duration,
) -> impl Stream<Item = Result<String, serde_json::Error>> + Send + 'static {
    run_events(delay).map(move |event| {
        let frame = event.to_frame();
        debug!(thread_id = %thread_id, kind = ?event.kind, "Streaming event");
        frame
    })
}
