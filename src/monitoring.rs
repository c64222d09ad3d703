use crate::error::PaperStreamError;
use anyhow::Result;
use metrics::{counter, gauge, Counter, Gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{net::SocketAddr, sync::LazyLock};
use tracing::{error, info};

// Global metrics
pub static MESSAGES_RECEIVED_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("paperstream_messages_received_total"));
pub static TRADE_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("paperstream_trades_total"));
pub static MALFORMED_FRAME_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("paperstream_malformed_frames_total"));
pub static IGNORED_ENVELOPE_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("paperstream_ignored_envelopes_total"));
pub static RECONNECT_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("paperstream_reconnects_total"));
pub static CONNECTED_GAUGE: LazyLock<Gauge> = LazyLock::new(|| gauge!("paperstream_connected"));

pub async fn setup_metrics(port: u16) -> Result<()> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    let builder = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", "paperstream-ws-client")
        .add_global_label("version", env!("CARGO_PKG_VERSION"));

    match builder.install() {
        Ok(_handle) => {
            info!(
                "Prometheus metrics server started on http://{}/metrics",
                addr
            );

            // Initialize metrics with default values
            MESSAGES_RECEIVED_COUNTER.absolute(0);
            TRADE_COUNTER.absolute(0);
            MALFORMED_FRAME_COUNTER.absolute(0);
            IGNORED_ENVELOPE_COUNTER.absolute(0);
            RECONNECT_COUNTER.absolute(0);
            CONNECTED_GAUGE.set(0.0);

            Ok(())
        }
        Err(e) => {
            error!("Failed to start metrics server: {}", e);
            Err(PaperStreamError::MetricsError(e.to_string()).into())
        }
    }
}

/// Point-in-time stream health snapshot, built from the shared client state
/// via [`crate::client_state::ClientState::health_status`].
#[derive(Debug)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub last_message_time: Option<chrono::DateTime<chrono::Utc>>,
    pub last_disconnection_time: Option<chrono::DateTime<chrono::Utc>>,
    pub total_messages: u64,
    pub total_trades: u64,
    pub malformed_frames: u64,
    pub ignored_envelopes: u64,
    pub reconnect_count: u64,
    pub uptime: chrono::Duration,
}

impl HealthStatus {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": if self.is_healthy { "healthy" } else { "unhealthy" },
            "last_message_time": self.last_message_time,
            "last_disconnection_time": self.last_disconnection_time,
            "total_messages": self.total_messages,
            "total_trades": self.total_trades,
            "malformed_frames": self.malformed_frames,
            "ignored_envelopes": self.ignored_envelopes,
            "reconnect_count": self.reconnect_count,
            "uptime_seconds": self.uptime.num_seconds(),
            "timestamp": chrono::Utc::now()
        })
    }
}
