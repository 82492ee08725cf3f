//! Monitored channels and the per-channel hysteresis state machine.
//!
//! ```text
//!               fault_count reaches threshold
//!   ┌────────┐ ────────────────────────────► ┌─────────┐
//!   │ Normal │                               │ Latched │
//!   └────────┘ ◄──────────────────────────── └─────────┘
//!               clear_count reaches threshold
//! ```
//!
//! A fault sample zeroes the clear counter and a clear sample zeroes the
//! fault counter, so only an unbroken run of identical samples can reach
//! the threshold.

use super::event::FaultEventKind;

/// Number of monitored channels.
pub const CHANNEL_COUNT: usize = 3;

/// The fixed set of monitored fault inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Display driver fault line.
    Lcd,
    /// LED driver fault line.
    Led,
    /// Serializer link status.
    Gmsl,
}

impl Channel {
    /// All channels in processing order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::Lcd, Channel::Led, Channel::Gmsl];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::Lcd => 0,
            Channel::Led => 1,
            Channel::Gmsl => 2,
        }
    }

    /// Name used in event text.
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Lcd => "LCD",
            Channel::Led => "LED",
            Channel::Gmsl => "GMSL",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Debounced state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultState {
    #[default]
    Normal,
    Latched,
}

/// Counters and state for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelState {
    fault_count: u8,
    clear_count: u8,
    state: FaultState,
}

impl ChannelState {
    pub const INITIAL: ChannelState = ChannelState {
        fault_count: 0,
        clear_count: 0,
        state: FaultState::Normal,
    };

    pub fn fault_count(&self) -> u8 {
        self.fault_count
    }

    pub fn clear_count(&self) -> u8 {
        self.clear_count
    }

    pub fn state(&self) -> FaultState {
        self.state
    }

    pub fn is_latched(&self) -> bool {
        self.state == FaultState::Latched
    }

    /// Feed one sample. Returns the transition this sample caused, if any.
    pub(crate) fn observe(&mut self, fault: bool, threshold: u8) -> Option<FaultEventKind> {
        if fault {
            if self.fault_count < threshold {
                self.fault_count += 1;
            }
            self.clear_count = 0;

            if self.fault_count >= threshold && self.state == FaultState::Normal {
                self.state = FaultState::Latched;
                return Some(FaultEventKind::Detected);
            }
        } else {
            if self.clear_count < threshold {
                self.clear_count += 1;
            }
            self.fault_count = 0;

            if self.clear_count >= threshold && self.state == FaultState::Latched {
                self.state = FaultState::Normal;
                return Some(FaultEventKind::Cleared);
            }
        }
        None
    }
}
