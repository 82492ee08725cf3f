//! Fault transition events and where they go.
//!
//! The event value (channel plus kind) is the contract; its `Display` text,
//! `"[FAULT] LCD detected"` / `"[CLEAR] LCD cleared"`, is what ends up in the
//! log.

use core::cell::RefCell;
use core::fmt;

use heapless::{Deque, Vec};

use super::channel::Channel;

/// Direction of a latch transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultEventKind {
    /// Normal → Latched.
    Detected,
    /// Latched → Normal.
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultEvent {
    pub channel: Channel,
    pub kind: FaultEventKind,
}

impl FaultEvent {
    pub const fn detected(channel: Channel) -> Self {
        Self {
            channel,
            kind: FaultEventKind::Detected,
        }
    }

    pub const fn cleared(channel: Channel) -> Self {
        Self {
            channel,
            kind: FaultEventKind::Cleared,
        }
    }
}

impl fmt::Display for FaultEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultEventKind::Detected => write!(f, "[FAULT] {} detected", self.channel),
            FaultEventKind::Cleared => write!(f, "[CLEAR] {} cleared", self.channel),
        }
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives every transition event, in the order they occur.
///
/// Called from inside the fault task, so it must not block.
pub trait FaultSink {
    fn report(&self, event: &FaultEvent);
}

/// Discard.
impl FaultSink for () {
    fn report(&self, _event: &FaultEvent) {}
}

impl<T: FaultSink + ?Sized> FaultSink for &T {
    fn report(&self, event: &FaultEvent) {
        (**self).report(event)
    }
}

/// Bounded in-memory event history. When full, the oldest event is dropped.
pub struct EventLog<const N: usize> {
    events: RefCell<Deque<FaultEvent, N>>,
}

impl<const N: usize> EventLog<N> {
    pub const fn new() -> Self {
        Self {
            events: RefCell::new(Deque::new()),
        }
    }

    /// Oldest retained event.
    pub fn pop(&self) -> Option<FaultEvent> {
        self.events.try_borrow_mut().ok()?.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.try_borrow().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.try_borrow_mut() {
            events.clear();
        }
    }

    /// Copy of the retained events, oldest first.
    pub fn snapshot(&self) -> Vec<FaultEvent, N> {
        let mut out = Vec::new();
        if let Ok(events) = self.events.try_borrow() {
            for event in events.iter() {
                // Same capacity as the deque, cannot overflow.
                let _ = out.push(*event);
            }
        }
        out
    }
}

impl<const N: usize> Default for EventLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FaultSink for EventLog<N> {
    fn report(&self, event: &FaultEvent) {
        if let Ok(mut events) = self.events.try_borrow_mut() {
            if events.is_full() {
                events.pop_front();
            }
            let _ = events.push_back(*event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_text() {
        assert_eq!(FaultEvent::detected(Channel::Lcd).to_string(), "[FAULT] LCD detected");
        assert_eq!(FaultEvent::cleared(Channel::Gmsl).to_string(), "[CLEAR] GMSL cleared");
    }

    #[test]
    fn log_drops_oldest_when_full() {
        let log: EventLog<2> = EventLog::new();
        log.report(&FaultEvent::detected(Channel::Lcd));
        log.report(&FaultEvent::detected(Channel::Led));
        log.report(&FaultEvent::cleared(Channel::Lcd));
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.snapshot().as_slice(),
            &[FaultEvent::detected(Channel::Led), FaultEvent::cleared(Channel::Lcd)]
        );
        assert_eq!(log.pop(), Some(FaultEvent::detected(Channel::Led)));
        log.clear();
        assert!(log.is_empty());
    }

    fn emit<S: FaultSink>(sink: S) {
        sink.report(&FaultEvent::detected(Channel::Gmsl));
    }

    #[test]
    fn sink_through_reference() {
        let log: EventLog<4> = EventLog::new();
        emit(&log);
        emit(());
        assert_eq!(log.pop(), Some(FaultEvent::detected(Channel::Gmsl)));
    }
}
