/// file: src/client_state.rs
/// description: shared connection state, trade buffer ownership and counters
use crate::buffer::TradeBuffer;
use crate::monitoring::HealthStatus;
use chrono::{DateTime, Utc};
use std::sync::{
    atomic::{AtomicU32, AtomicU64, Ordering},
    Arc,
};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Connectivity state of the stream client.
///
/// `Connecting -> Open` on socket open. Any state moves to `Closed` on
/// close/error; the reconnect policy then drives
/// `Closed -> Reconnecting -> Connecting`. Once the give-up threshold is hit
/// the state stays `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Reconnecting { attempt: u32 },
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }

    /// Status label shown next to the feed ("Live" / "Reconnecting").
    pub fn status_label(&self) -> &'static str {
        match self {
            ConnectionState::Open => "Live",
            _ => "Reconnecting",
        }
    }
}

#[derive(Debug)]
pub struct ClientState {
    pub connection_id: String,
    pub connection: ConnectionState,
    pub buffer: TradeBuffer,
    pub reconnect_count: AtomicU32,
    pub last_message_time: Option<Instant>,
    pub last_disconnection_time: Option<Instant>,

    // Stream integrity counters
    pub trade_count: AtomicU64,
    pub total_messages_received: AtomicU64,
    pub malformed_frames: AtomicU64,
    pub ignored_envelopes: AtomicU64,
}

impl ClientState {
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            connection_id: uuid::Uuid::new_v4().to_string(),
            connection: ConnectionState::Connecting,
            buffer: TradeBuffer::new(buffer_capacity),
            reconnect_count: AtomicU32::new(0),
            last_message_time: None,
            last_disconnection_time: None,
            trade_count: AtomicU64::new(0),
            total_messages_received: AtomicU64::new(0),
            malformed_frames: AtomicU64::new(0),
            ignored_envelopes: AtomicU64::new(0),
        }
    }

    /// Fresh connection id and counters for a new (re)connection attempt.
    pub fn begin_connection(&mut self) {
        self.connection_id = uuid::Uuid::new_v4().to_string();
        self.connection = ConnectionState::Connecting;
    }

    pub fn mark_open(&mut self) {
        self.connection = ConnectionState::Open;
        self.last_message_time = Some(Instant::now());
        self.reconnect_count.store(0, Ordering::Relaxed);
    }

    pub fn mark_closed(&mut self) {
        self.connection = ConnectionState::Closed;
        self.last_disconnection_time = Some(Instant::now());
    }

    pub fn mark_reconnecting(&mut self) -> u32 {
        let attempt = self.reconnect_count.fetch_add(1, Ordering::AcqRel) + 1;
        self.connection = ConnectionState::Reconnecting { attempt };
        attempt
    }

    pub fn record_message(&mut self) {
        self.last_message_time = Some(Instant::now());
        self.total_messages_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_trade(&self) {
        self.trade_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed_frame(&self) {
        self.malformed_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored_envelope(&self) {
        self.ignored_envelopes.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time health snapshot for the final status dump and metrics
    /// surface.
    pub fn health_status(&self, uptime: chrono::Duration) -> HealthStatus {
        HealthStatus {
            is_healthy: self.connection.is_open(),
            last_message_time: instant_to_utc(self.last_message_time),
            last_disconnection_time: instant_to_utc(self.last_disconnection_time),
            total_messages: self.total_messages_received.load(Ordering::Relaxed),
            total_trades: self.trade_count.load(Ordering::Relaxed),
            malformed_frames: self.malformed_frames.load(Ordering::Relaxed),
            ignored_envelopes: self.ignored_envelopes.load(Ordering::Relaxed),
            reconnect_count: self.reconnect_count.load(Ordering::Relaxed) as u64,
            uptime,
        }
    }
}

/// Monotonic instants carry no calendar date; anchor them against now.
fn instant_to_utc(instant: Option<Instant>) -> Option<DateTime<Utc>> {
    instant.and_then(|t| {
        let elapsed = chrono::Duration::from_std(t.elapsed()).ok()?;
        Some(Utc::now() - elapsed)
    })
}

pub type SharedClientState = Arc<Mutex<ClientState>>;

pub fn shared_state(buffer_capacity: usize) -> SharedClientState {
    Arc::new(Mutex::new(ClientState::new(buffer_capacity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_machine_transitions() {
        let mut state = ClientState::new(30);
        assert_eq!(state.connection, ConnectionState::Connecting);

        state.mark_open();
        assert!(state.connection.is_open());
        assert_eq!(state.connection.status_label(), "Live");

        state.mark_closed();
        assert_eq!(state.connection, ConnectionState::Closed);
        assert_eq!(state.connection.status_label(), "Reconnecting");

        let attempt = state.mark_reconnecting();
        assert_eq!(attempt, 1);
        assert_eq!(state.connection, ConnectionState::Reconnecting { attempt: 1 });
        assert_eq!(state.mark_reconnecting(), 2);
    }

    #[test]
    fn health_snapshot_reflects_counters_and_connectivity() {
        let mut state = ClientState::new(30);
        state.mark_open();
        state.record_message();
        state.record_trade();
        state.record_malformed_frame();
        state.record_ignored_envelope();
        state.mark_closed();

        let health = state.health_status(chrono::Duration::seconds(5));
        assert!(!health.is_healthy);
        assert_eq!(health.total_messages, 1);
        assert_eq!(health.total_trades, 1);
        assert_eq!(health.malformed_frames, 1);
        assert_eq!(health.ignored_envelopes, 1);
        assert!(health.last_message_time.is_some());
        assert!(health.last_disconnection_time.is_some());

        let json = health.to_json();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["uptime_seconds"], 5);
        assert_eq!(json["total_trades"], 1);
        assert!(!json["last_disconnection_time"].is_null());
    }

    #[test]
    fn healthy_while_open_with_no_disconnects() {
        let mut state = ClientState::new(30);
        state.mark_open();
        let health = state.health_status(chrono::Duration::seconds(1));
        assert!(health.is_healthy);
        assert!(health.last_disconnection_time.is_none());
        assert_eq!(health.to_json()["status"], "healthy");
    }

    #[test]
    fn successful_open_resets_attempt_counter() {
        let mut state = ClientState::new(30);
        state.mark_reconnecting();
        state.mark_reconnecting();
        state.mark_open();
        assert_eq!(state.reconnect_count.load(Ordering::Relaxed), 0);
    }
}
