// file: src/client.rs
// description: WebSocket client for the simulated paper-trading event stream

use crate::{
    client_state::SharedClientState,
    config::Config,
    error::PaperStreamError,
    events::{ClientEvent, EventSender},
    types::StreamMessage,
};
use anyhow::Result;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, trace, warn};

pub struct PaperStreamClient {
    pub config: Arc<Config>,
    event_sender: EventSender,
    pub state: SharedClientState,
}

impl PaperStreamClient {
    pub fn new(config: Arc<Config>, event_sender: EventSender, state: SharedClientState) -> Self {
        Self {
            config,
            event_sender,
            state,
        }
    }

    /// Drive the connection until the reconnect policy gives up.
    ///
    /// Dropping the returned future tears the connection down; the socket is
    /// owned by this task, so no buffer mutation can happen afterwards.
    pub async fn run(&mut self) -> Result<()> {
        let _ = self.send_event(ClientEvent::Starting).await;

        // connect_and_run only returns once the connection is down, so every
        // exit (server close included) feeds the reconnect policy until the
        // attempt budget runs out.
        let result: Result<()> = loop {
            if let Err(e) = self.connect_and_run().await {
                error!("Connection error: {}", e);
            }
            if let Err(give_up) = self.handle_connection_error().await {
                break Err(give_up);
            }
        };

        let _ = self.send_event(ClientEvent::Stopping).await;
        result
    }

    async fn connect_and_run(&mut self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            state.begin_connection();
        }

        let endpoint = self.config.stream.endpoint.clone();
        let _ = self
            .send_event(ClientEvent::Connecting {
                url: endpoint.to_string(),
            })
            .await;

        let (ws_stream, _) = connect_async(endpoint.as_str()).await.map_err(|e| {
            error!("Failed to connect to WebSocket: {}", e);
            PaperStreamError::WebSocketError(e)
        })?;

        info!("WebSocket connection established to {}", endpoint);
        crate::monitoring::CONNECTED_GAUGE.set(1.0);

        let connection_id = {
            let mut state = self.state.lock().await;
            state.mark_open();
            state.connection_id.clone()
        };
        let _ = self
            .send_event(ClientEvent::Connected { connection_id })
            .await;

        // The paper stream is server-push only; no subscription handshake.
        let (_write, mut read) = ws_stream.split();

        let result = self.handle_message_stream(&mut read).await;

        crate::monitoring::CONNECTED_GAUGE.set(0.0);
        {
            let mut state = self.state.lock().await;
            state.mark_closed();
        }
        result
    }

    async fn handle_message_stream(
        &mut self,
        read: &mut futures_util::stream::SplitStream<
            tokio_tungstenite::WebSocketStream<
                tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
            >,
        >,
    ) -> Result<()> {
        info!("Starting message handling loop");

        while let Some(message) = read.next().await {
            match message {
                Ok(msg) => {
                    if let Err(e) = self.handle_frame(msg).await {
                        return Err(e);
                    }
                }
                Err(e) => {
                    error!("WebSocket stream error: {}", e);
                    return Err(PaperStreamError::WebSocketError(e).into());
                }
            }
        }

        warn!("WebSocket stream ended without close frame");
        Err(PaperStreamError::ConnectionClosed.into())
    }

    async fn handle_frame(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Text(text) => {
                trace!("Received text frame: {}", text);
                {
                    let mut state = self.state.lock().await;
                    state.record_message();
                }
                crate::monitoring::MESSAGES_RECEIVED_COUNTER.increment(1);
                self.handle_text(&text).await;
            }
            Message::Binary(data) => {
                debug!("Received binary frame of {} bytes", data.len());
                warn!("Binary frames not supported by the paper stream");
            }
            Message::Ping(_) => {
                debug!("Received ping");
                // tungstenite answers pings automatically
            }
            Message::Pong(_) => {
                debug!("Received pong");
            }
            Message::Close(frame) => {
                warn!("Received close frame: {:?}", frame);
                let _ = self.send_event(ClientEvent::Disconnected).await;
                return Err(PaperStreamError::ConnectionClosed.into());
            }
            Message::Frame(_) => {
                debug!("Received raw frame");
            }
        }
        Ok(())
    }

    /// Decode one text frame and apply it to the buffer.
    ///
    /// Failure never propagates: a malformed frame is logged, counted, and
    /// dropped, leaving buffer and connection state untouched. Unrecognized
    /// envelope types are reserved upstream and ignored.
    async fn handle_text(&mut self, text: &str) {
        match StreamMessage::parse(text) {
            Ok(StreamMessage::Trade(trade)) => {
                let shared = {
                    let mut state = self.state.lock().await;
                    state.record_trade();
                    state.buffer.push(trade)
                };
                crate::monitoring::TRADE_COUNTER.increment(1);
                trace!(
                    symbol = %shared.symbol,
                    side = %shared.side,
                    quantity = shared.quantity,
                    price = shared.price,
                    pnl = shared.pnl,
                    "Buffered trade"
                );
                let _ = self.send_event(ClientEvent::TradeReceived(shared)).await;
            }
            Ok(StreamMessage::Unknown(kind)) => {
                debug!("Ignoring envelope of type '{}'", kind);
                {
                    let state = self.state.lock().await;
                    state.record_ignored_envelope();
                }
                crate::monitoring::IGNORED_ENVELOPE_COUNTER.increment(1);
                let _ = self.send_event(ClientEvent::EnvelopeIgnored { kind }).await;
            }
            Err(e) => {
                warn!(
                    "Failed to parse stream frame: {}. Frame: {}",
                    e,
                    text.chars().take(100).collect::<String>()
                );
                {
                    let state = self.state.lock().await;
                    state.record_malformed_frame();
                }
                crate::monitoring::MALFORMED_FRAME_COUNTER.increment(1);
                let _ = self
                    .send_event(ClientEvent::MalformedFrame {
                        error: e.to_string(),
                    })
                    .await;
            }
        }
    }

    /// Bounded exponential backoff with jitter; errors once the attempt
    /// budget is exhausted.
    async fn handle_connection_error(&mut self) -> Result<()> {
        let attempt = {
            let mut state = self.state.lock().await;
            state.mark_reconnecting()
        };
        crate::monitoring::RECONNECT_COUNTER.increment(1);

        let max_reconnects = self.config.stream.max_reconnects;
        if max_reconnects > 0 && attempt > max_reconnects {
            error!(
                "Maximum reconnection attempts ({}) reached, giving up",
                max_reconnects
            );
            {
                let mut state = self.state.lock().await;
                state.mark_closed();
            }
            let _ = self
                .send_event(ClientEvent::GaveUp { attempts: attempt })
                .await;
            return Err(PaperStreamError::MaxReconnectsExceeded.into());
        }

        let delay = backoff_delay(
            self.config.stream.reconnect_delay,
            self.config.stream.max_reconnect_delay,
            attempt,
        );
        warn!(
            "Reconnecting in {} ms (attempt {})",
            delay.as_millis(),
            attempt
        );

        let _ = self
            .send_event(ClientEvent::Reconnecting {
                attempt,
                delay_ms: delay.as_millis() as u64,
            })
            .await;

        sleep(delay).await;
        Ok(())
    }

    async fn send_event(&self, event: ClientEvent) -> Result<()> {
        self.event_sender
            .send(event)
            .await
            .map_err(|e| PaperStreamError::EventSendError(e.to_string()).into())
    }
}

/// Backoff for attempt n: `base * 2^(n-1)` capped at `max`, plus up to 50%
/// uniform jitter so a fleet of clients does not thunder back in sync.
fn backoff_delay(base: Duration, max: Duration, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    let scaled = base.saturating_mul(1u32 << exp).min(max);
    let jitter_ms = (scaled.as_millis() as u64 / 2).max(1);
    scaled + Duration::from_millis(fastrand::u64(0..jitter_ms))
}
