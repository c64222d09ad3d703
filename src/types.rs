/// file: src/types.rs
/// description: data models for the paper-trading stream wire protocol
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction as sent by the paper-trading engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn is_buy(&self) -> bool {
        matches!(self, Side::Buy)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Side::Sell)
    }

    /// Uppercase label for display.
    pub fn formatted(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        })
    }
}

/// One simulated trade as emitted by the paper-trading engine.
///
/// Immutable once decoded. The upstream does not guarantee a unique event
/// id; `created_at` is optional and may collide, so display identity is
/// position in the rolling buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    pub pnl: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TradeEvent {
    /// Notional value of the trade (price * quantity).
    pub fn value(&self) -> f64 {
        self.price * self.quantity
    }

    /// Timestamp in local time, when the upstream attached one.
    pub fn created_at_local(&self) -> Option<DateTime<Local>> {
        self.created_at.map(|ts| ts.with_timezone(&Local))
    }

    /// Explanation text with the upstream's placeholder for untagged events.
    pub fn explanation_or_default(&self) -> &str {
        self.explanation.as_deref().unwrap_or("Model-driven signal")
    }
}

/// Raw wire envelope: a `type` discriminator plus an opaque payload.
///
/// The upstream also attaches extra top-level fields (a `signal` object on
/// trade envelopes); those are tolerated and dropped here.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Closed classification of an inbound envelope.
///
/// Only `trade` is acted on today; every other `type` value is reserved by
/// the upstream and lands in `Unknown` so callers handle it exhaustively.
#[derive(Debug, Clone)]
pub enum StreamMessage {
    Trade(TradeEvent),
    Unknown(String),
}

impl StreamMessage {
    /// Parse a text frame into a classified stream message.
    ///
    /// Fails on malformed JSON or on a `trade` envelope whose payload does
    /// not decode as a [`TradeEvent`]; unrecognized envelope types succeed
    /// as [`StreamMessage::Unknown`].
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let envelope: RawEnvelope = serde_json::from_str(text)?;
        match envelope.kind.as_str() {
            "trade" => {
                let payload = envelope.payload.unwrap_or(serde_json::Value::Null);
                let trade: TradeEvent = serde_json::from_value(payload)?;
                Ok(StreamMessage::Trade(trade))
            }
            _ => Ok(StreamMessage::Unknown(envelope.kind)),
        }
    }
}
