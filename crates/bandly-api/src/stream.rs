//! Server-sent-events notification channel.
//!
//! Holds one persistent `text/event-stream` connection per authenticated
//! session and fans parsed events out through a [`tokio::sync::broadcast`]
//! channel. The channel does **not** reconnect on its own: a transport
//! error is surfaced to subscribers as [`ChannelEvent::Error`] and the
//! read loop exits. Reconnection policy belongs to the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use bandly_api::stream::{EventChannel, StreamAuth};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let channel = EventChannel::connect(url, &token, StreamAuth::Header, &transport, cancel)?;
//! let mut rx = channel.subscribe();
//!
//! while let Ok(event) = rx.recv().await {
//!     println!("{event:?}");
//! }
//!
//! channel.shutdown();
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Broadcast channel capacity ───────────────────────────────────────

const EVENT_CHANNEL_CAPACITY: usize = 256;

// ── Credential placement ─────────────────────────────────────────────

/// Where the bearer token rides on the stream request.
///
/// `Header` is the default and the right choice for this transport.
/// `QueryParam` exists for deployments fronted by proxies that strip
/// custom headers from long-lived connections; it puts the credential
/// in the URL (`access_token=`), which logs and intermediaries may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamAuth {
    #[default]
    Header,
    QueryParam,
}

// ── Events ───────────────────────────────────────────────────────────

/// A user-facing alert pushed by the backend.
///
/// Built leniently from the event payload: JSON payloads keep their
/// structure in `payload`, anything else is carried as an opaque string.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Event id when the server provides one; used for deduplication.
    pub id: Option<String>,
    /// Alert kind, e.g. `"reminder.due"`, `"course.published"`.
    pub kind: String,
    /// Human-readable alert text, if present.
    pub message: Option<String>,
    /// The full payload as received.
    pub payload: serde_json::Value,
    /// Local arrival time.
    pub received_at: DateTime<Utc>,
}

/// A parsed event from the notification stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Server acknowledged the subscription.
    Connected,
    /// A pushed alert.
    Notification(Notification),
    /// Server-signalled or transport-level failure. The read loop ends
    /// after a transport error; subscribers decide whether to reconnect.
    Error { message: String },
}

// ── EventChannel ─────────────────────────────────────────────────────

/// Handle to a running notification stream.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) cancels
/// the in-flight read and releases the connection -- repeated
/// connect/shutdown cycles leak nothing.
pub struct EventChannel {
    event_rx: broadcast::Receiver<Arc<ChannelEvent>>,
    cancel: CancellationToken,
}

impl EventChannel {
    /// Open the stream and spawn the background read loop.
    ///
    /// Returns immediately once the task is spawned; the HTTP request is
    /// issued asynchronously. Subscribe to consume events.
    pub fn connect(
        stream_url: Url,
        token: &secrecy::SecretString,
        auth: StreamAuth,
        transport: &TransportConfig,
        cancel: CancellationToken,
    ) -> Result<Self, Error> {
        let http = transport.build_stream_client()?;

        let mut url = stream_url;
        let bearer = match auth {
            StreamAuth::Header => {
                let mut value =
                    HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                        .map_err(|e| Error::Stream(format!("invalid token header value: {e}")))?;
                value.set_sensitive(true);
                Some(value)
            }
            StreamAuth::QueryParam => {
                url.query_pairs_mut()
                    .append_pair("access_token", token.expose_secret());
                None
            }
        };

        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            read_loop(http, url, bearer, event_tx, task_cancel).await;
        });

        Ok(Self { event_rx, cancel })
    }

    /// Get a new broadcast receiver for the event stream.
    ///
    /// Multiple consumers can subscribe concurrently. A consumer that
    /// falls behind receives [`broadcast::error::RecvError::Lagged`];
    /// when the read loop ends, receivers see `RecvError::Closed`.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<ChannelEvent>> {
        self.event_rx.resubscribe()
    }

    /// Cancel the in-flight read and release the connection.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Read loop ────────────────────────────────────────────────────────

/// Issue the stream request and read frames until the connection drops,
/// errors, or the token is cancelled. Runs exactly once -- no reconnect.
async fn read_loop(
    http: reqwest::Client,
    url: Url,
    bearer: Option<HeaderValue>,
    event_tx: broadcast::Sender<Arc<ChannelEvent>>,
    cancel: CancellationToken,
) {
    tracing::info!(url = %url.path(), "connecting to notification stream");

    let mut request = http.get(url).header(ACCEPT, "text/event-stream");
    if let Some(value) = bearer {
        request = request.header(AUTHORIZATION, value);
    }

    let response = tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        resp = request.send() => resp,
    };

    let response = match response {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            let _ = event_tx.send(Arc::new(ChannelEvent::Error {
                message: format!("stream rejected: HTTP {}", resp.status()),
            }));
            return;
        }
        Err(e) => {
            let _ = event_tx.send(Arc::new(ChannelEvent::Error {
                message: format!("stream connection failed: {e}"),
            }));
            return;
        }
    };

    tracing::info!("notification stream connected");

    let mut body = response.bytes_stream();
    let mut buffer = String::new();
    let mut parser = SseParser::default();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("notification stream cancelled");
                return;
            }
            chunk = body.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        while let Some(pos) = buffer.find('\n') {
                            let line: String = buffer.drain(..=pos).collect();
                            if let Some(frame) = parser.push_line(line.trim_end_matches('\n')) {
                                if let Some(event) = frame.into_event() {
                                    // Ignore send errors -- no active subscribers right now
                                    let _ = event_tx.send(Arc::new(event));
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "notification stream read failed");
                        let _ = event_tx.send(Arc::new(ChannelEvent::Error {
                            message: format!("stream read failed: {e}"),
                        }));
                        return;
                    }
                    None => {
                        // Clean end of stream; dropping the sender closes
                        // every receiver deterministically.
                        tracing::info!("notification stream ended");
                        return;
                    }
                }
            }
        }
    }
}

// ── SSE framing ──────────────────────────────────────────────────────

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SseFrame {
    event: String,
    data: String,
    id: Option<String>,
}

/// Incremental line-oriented SSE parser.
///
/// Feed it one line at a time (without the trailing newline); a blank
/// line dispatches the accumulated frame. Comment lines (`:`) and
/// unknown fields (`retry`, ...) are skipped.
#[derive(Debug, Default)]
struct SseParser {
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
}

impl SseParser {
    fn push_line(&mut self, line: &str) -> Option<SseFrame> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_owned()),
            "data" => self.data.push(value.to_owned()),
            "id" => self.id = Some(value.to_owned()),
            _ => {} // retry and vendor fields
        }
        None
    }

    /// Emit the buffered frame, if it carries any data.
    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data);
        let id = self.id.take();

        if data.is_empty() {
            return None;
        }

        Some(SseFrame {
            event: event.unwrap_or_else(|| "message".to_owned()),
            data: data.join("\n"),
            id,
        })
    }
}

impl SseFrame {
    /// Map a named frame onto a [`ChannelEvent`].
    ///
    /// Unknown event names are dropped here -- never fatal, never
    /// forwarded to subscribers.
    fn into_event(self) -> Option<ChannelEvent> {
        match self.event.as_str() {
            "connected" => Some(ChannelEvent::Connected),
            "notification" => Some(ChannelEvent::Notification(notification_from_frame(&self))),
            "error" => Some(ChannelEvent::Error {
                message: error_message_from_data(&self.data),
            }),
            other => {
                tracing::trace!(event = other, "ignoring unknown stream event");
                None
            }
        }
    }
}

/// Build a [`Notification`] from a frame, parsing the payload as JSON
/// when possible and carrying it as an opaque string otherwise.
fn notification_from_frame(frame: &SseFrame) -> Notification {
    match serde_json::from_str::<serde_json::Value>(&frame.data) {
        Ok(payload) => Notification {
            id: frame.id.clone().or_else(|| {
                payload["id"].as_str().map(String::from)
            }),
            kind: payload["kind"]
                .as_str()
                .or_else(|| payload["type"].as_str())
                .unwrap_or("notification")
                .to_owned(),
            message: payload["message"]
                .as_str()
                .or_else(|| payload["body"].as_str())
                .map(String::from),
            payload,
            received_at: Utc::now(),
        },
        Err(_) => Notification {
            id: frame.id.clone(),
            kind: "notification".to_owned(),
            message: Some(frame.data.clone()),
            payload: serde_json::Value::String(frame.data.clone()),
            received_at: Utc::now(),
        },
    }
}

fn error_message_from_data(data: &str) -> String {
    serde_json::from_str::<serde_json::Value>(data)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or_else(|| data.to_owned())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn feed(parser: &mut SseParser, raw: &str) -> Vec<SseFrame> {
        raw.lines().filter_map(|l| parser.push_line(l)).collect()
    }

    #[test]
    fn parses_named_event_with_id() {
        let mut parser = SseParser::default();
        let frames = feed(
            &mut parser,
            "event: notification\nid: n-1\ndata: {\"kind\":\"reminder.due\"}\n\n",
        );

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "notification");
        assert_eq!(frames[0].id.as_deref(), Some("n-1"));
    }

    #[test]
    fn joins_multi_line_data() {
        let mut parser = SseParser::default();
        let frames = feed(&mut parser, "data: first\ndata: second\n\n");

        assert_eq!(frames[0].event, "message");
        assert_eq!(frames[0].data, "first\nsecond");
    }

    #[test]
    fn skips_comments_and_retry_fields() {
        let mut parser = SseParser::default();
        let frames = feed(&mut parser, ": keepalive\nretry: 5000\n\n");
        assert!(frames.is_empty());
    }

    #[test]
    fn blank_line_without_data_dispatches_nothing() {
        let mut parser = SseParser::default();
        let frames = feed(&mut parser, "event: connected-ish\n\n");
        assert!(frames.is_empty());
    }

    #[test]
    fn unknown_event_type_is_ignored() {
        let mut parser = SseParser::default();
        let frames = feed(&mut parser, "event: presence\ndata: {\"online\":3}\n\n");

        assert_eq!(frames.len(), 1);
        assert!(frames.into_iter().next().unwrap().into_event().is_none());
    }

    #[test]
    fn connected_event_needs_a_data_line() {
        let mut parser = SseParser::default();
        let frames = feed(&mut parser, "event: connected\ndata: ok\n\n");

        assert_eq!(
            frames.into_iter().next().unwrap().into_event(),
            Some(ChannelEvent::Connected)
        );
    }

    #[test]
    fn notification_payload_parsed_as_json() {
        let frame = SseFrame {
            event: "notification".into(),
            data: r#"{"id":"n-7","kind":"course.published","message":"New course: Writing Band 7"}"#
                .into(),
            id: None,
        };

        let Some(ChannelEvent::Notification(n)) = frame.into_event() else {
            panic!("expected notification");
        };
        assert_eq!(n.id.as_deref(), Some("n-7"));
        assert_eq!(n.kind, "course.published");
        assert_eq!(n.message.as_deref(), Some("New course: Writing Band 7"));
        assert_eq!(n.payload["kind"], "course.published");
    }

    #[test]
    fn frame_id_wins_over_payload_id() {
        let frame = SseFrame {
            event: "notification".into(),
            data: r#"{"id":"payload-id"}"#.into(),
            id: Some("frame-id".into()),
        };

        let Some(ChannelEvent::Notification(n)) = frame.into_event() else {
            panic!("expected notification");
        };
        assert_eq!(n.id.as_deref(), Some("frame-id"));
    }

    #[test]
    fn non_json_payload_is_carried_opaque() {
        let frame = SseFrame {
            event: "notification".into(),
            data: "plain text alert".into(),
            id: None,
        };

        let Some(ChannelEvent::Notification(n)) = frame.into_event() else {
            panic!("expected notification");
        };
        assert_eq!(n.kind, "notification");
        assert_eq!(n.message.as_deref(), Some("plain text alert"));
        assert_eq!(
            n.payload,
            serde_json::Value::String("plain text alert".into())
        );
    }

    #[test]
    fn error_event_extracts_message() {
        let frame = SseFrame {
            event: "error".into(),
            data: r#"{"message":"subscription limit reached"}"#.into(),
            id: None,
        };

        assert_eq!(
            frame.into_event(),
            Some(ChannelEvent::Error {
                message: "subscription limit reached".into()
            })
        );
    }
}
