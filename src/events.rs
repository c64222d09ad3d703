/// file: src/events.rs
/// description: event channel decoupling the stream client from presentation
use crate::types::TradeEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

// Trades are shared via Arc so the buffer and the UI never clone payloads.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    Starting,
    Connecting { url: String },
    Connected { connection_id: String },
    TradeReceived(Arc<TradeEvent>),
    EnvelopeIgnored { kind: String },
    MalformedFrame { error: String },
    Disconnected,
    Reconnecting { attempt: u32, delay_ms: u64 },
    GaveUp { attempts: u32 },
    Stopping,
}

// Bounded so a stalled consumer cannot grow memory without limit. The paper
// feed emits roughly one trade every few seconds, so 1024 is generous.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

pub type EventSender = mpsc::Sender<ClientEvent>;
pub type EventReceiver = mpsc::Receiver<ClientEvent>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}
