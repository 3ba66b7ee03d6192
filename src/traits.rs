use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::AppError;
use crate::render::{Bubble, HistoryEntry};
use crate::signal::{encode_frame, Callsign, Signal};

/// Outbound side of the relay connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn send_signal(&self, signal: Signal, callsign: &Callsign) -> Result<(), AppError>;
}

/// Audio output. One continuous sidetone for the local key, one-shot blips
/// for remote marks; overlapping tones are fine.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait ToneSink: Send + Sync {
    /// Local key pressed: sidetone on until [`key_up`](Self::key_up).
    fn key_down(&self);
    fn key_up(&self);
    /// Play back a remote mark for its nominal duration.
    fn blip(&self, signal: Signal);
}

/// Display output for live and finalized bubbles.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait BubbleSink: Send + Sync {
    /// Replace the in-progress bubble for one participant.
    fn live(&self, callsign: &Callsign, bubble: &Bubble);
    /// Append a finalized transmission to the room view.
    fn history(&self, entry: &HistoryEntry);
    /// Remove a participant's in-progress bubble after a flush.
    fn clear_live(&self, callsign: &Callsign);
}

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Relay transport over the room websocket.
pub(crate) struct WsTransport {
    sink: tokio::sync::Mutex<WsSink>,
}

impl WsTransport {
    pub(crate) fn new(sink: WsSink) -> Self {
        Self {
            sink: tokio::sync::Mutex::new(sink),
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_signal(&self, signal: Signal, callsign: &Callsign) -> Result<(), AppError> {
        let frame = encode_frame(signal, callsign);
        self.sink.lock().await.send(Message::Text(frame)).await?;
        Ok(())
    }
}
