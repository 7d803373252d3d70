//! push.rs - Push channel listener
//!
//! Connects to the fundraiser's socket.io endpoint over a raw websocket and
//! waits for the first occurrence of a named event. First settlement wins:
//! the connection is dropped as soon as a matching event arrives, so later
//! events are unreachable by construction. Connection errors are logged and
//! the listener re-dials; only the deadline ends the call.

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Pause between re-dial attempts after a connection error.
const REDIAL_DELAY: Duration = Duration::from_secs(2);

pub struct PushListener {
    endpoint: String,
    event_name: String,
    timeout: Duration,
}

impl PushListener {
    pub fn new(endpoint: &str, event_name: &str, timeout: Duration) -> Self {
        PushListener {
            endpoint: endpoint.to_string(),
            event_name: event_name.to_string(),
            timeout,
        }
    }

    /// Wait for the first `event_name` event, up to the configured timeout.
    /// `None` means no event was observed before the deadline.
    pub async fn listen(&self) -> Option<Value> {
        let deadline = Instant::now() + self.timeout;

        loop {
            if Instant::now() >= deadline {
                info!("push channel: timeout reached, disconnecting");
                return None;
            }

            let connect = timeout_at(deadline, connect_async(self.endpoint.as_str())).await;
            let mut stream = match connect {
                Ok(Ok((stream, _response))) => {
                    debug!("push channel connected: {}", self.endpoint);
                    stream
                }
                Ok(Err(e)) => {
                    // not a failure of the call: log and wait out the deadline
                    warn!("push channel connect error (will re-dial): {}", e);
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    sleep(REDIAL_DELAY.min(remaining)).await;
                    continue;
                }
                Err(_) => {
                    info!("push channel: timeout reached, disconnecting");
                    return None;
                }
            };

            loop {
                let frame = match timeout_at(deadline, stream.next()).await {
                    Ok(Some(frame)) => frame,
                    Ok(None) => {
                        warn!("push channel closed by server, re-dialing");
                        break;
                    }
                    Err(_) => {
                        info!("push channel: timeout reached, disconnecting");
                        let _ = stream.close(None).await;
                        return None;
                    }
                };

                match frame {
                    Ok(Message::Text(text)) => {
                        // engine.io handshake and heartbeat
                        if text.starts_with('0') {
                            let _ = stream.send(Message::Text("40".into())).await;
                            continue;
                        }
                        if text == "2" {
                            let _ = stream.send(Message::Text("3".into())).await;
                            continue;
                        }

                        if let Some(payload) = parse_event_frame(&text, &self.event_name) {
                            info!("push channel: received '{}' event", self.event_name);
                            let _ = stream.close(None).await;
                            return Some(payload);
                        }
                    }
                    Ok(Message::Ping(data)) => {
                        let _ = stream.send(Message::Pong(data)).await;
                    }
                    Ok(Message::Close(_)) => {
                        warn!("push channel closed by server, re-dialing");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("push channel read error (will re-dial): {}", e);
                        break;
                    }
                }
            }
        }
    }
}

/// Extract the payload of a named event from one text frame.
///
/// Understands the socket.io wire shape (`42["total",{...}]`, numeric packet
/// prefix stripped) and a plain `{"event":"total","data":{...}}` object.
pub fn parse_event_frame(text: &str, event_name: &str) -> Option<Value> {
    let body = text.trim_start_matches(|c: char| c.is_ascii_digit());
    let value: Value = serde_json::from_str(body).ok()?;

    match &value {
        Value::Array(items) => {
            if items.first().and_then(Value::as_str) == Some(event_name) {
                Some(items.get(1).cloned().unwrap_or(Value::Null))
            } else {
                None
            }
        }
        Value::Object(map) => {
            if map.get("event").and_then(Value::as_str) == Some(event_name) {
                Some(map.get("data").cloned().unwrap_or(Value::Null))
            } else {
                None
            }
        }
        _ => None,
    }
}
