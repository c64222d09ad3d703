/// file: src/buffer.rs
/// description: fixed-capacity newest-first rolling buffer of trade events
use crate::types::TradeEvent;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of trades retained for display.
pub const DEFAULT_CAPACITY: usize = 30;

/// Rolling buffer of the most recent trades, newest first.
///
/// Pushing beyond capacity evicts from the tail (oldest). Events are shared
/// via `Arc`, so snapshots handed to the presentation layer stay valid and
/// unmodified no matter how many pushes happen afterwards. Memory only; the
/// buffer mirrors a live feed, not a system of record.
#[derive(Debug, Clone)]
pub struct TradeBuffer {
    events: VecDeque<Arc<TradeEvent>>,
    capacity: usize,
}

impl TradeBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Prepend an event, evicting the oldest entry once full.
    ///
    /// No deduplication: identical back-to-back events are kept as separate
    /// entries, matching what the feed delivered.
    pub fn push(&mut self, event: TradeEvent) -> Arc<TradeEvent> {
        let event = Arc::new(event);
        self.events.push_front(Arc::clone(&event));
        self.events.truncate(self.capacity);
        event
    }

    /// Newest-first view of the retained events.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TradeEvent>> {
        self.events.iter()
    }

    /// Newest-first snapshot safe to hand across task boundaries.
    pub fn snapshot(&self) -> Vec<Arc<TradeEvent>> {
        self.events.iter().cloned().collect()
    }
}

impl Default for TradeBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
