//! Fault input sampling.
//!
//! The latch reads all channels through a [`SampleSource`] as one
//! [`FaultSnapshot`] per invocation. Two interchangeable forms:
//!
//! - **Live**: any `FnMut() -> FaultSnapshot` closure reading GPIO or a
//!   status register
//! - **Replay**: [`ReplaySource`], cycling a precomputed trace for
//!   deterministic runs

use super::channel::{Channel, CHANNEL_COUNT};

/// One reading of every channel, taken at a single instant.
/// `true` means the fault input is asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultSnapshot {
    faults: [bool; CHANNEL_COUNT],
}

impl FaultSnapshot {
    /// No faults asserted.
    pub const CLEAR: FaultSnapshot = FaultSnapshot {
        faults: [false; CHANNEL_COUNT],
    };

    pub const fn new(lcd: bool, led: bool, gmsl: bool) -> Self {
        Self {
            faults: [lcd, led, gmsl],
        }
    }

    pub const fn from_array(faults: [bool; CHANNEL_COUNT]) -> Self {
        Self { faults }
    }

    /// Every channel set to `fault`.
    pub const fn uniform(fault: bool) -> Self {
        Self {
            faults: [fault; CHANNEL_COUNT],
        }
    }

    #[inline]
    pub fn get(&self, channel: Channel) -> bool {
        self.faults[channel.index()]
    }

    pub fn set(&mut self, channel: Channel, fault: bool) {
        self.faults[channel.index()] = fault;
    }
}

/// Supplies one snapshot per call. Must not block.
pub trait SampleSource {
    fn sample(&mut self) -> FaultSnapshot;
}

impl<S: FnMut() -> FaultSnapshot> SampleSource for S {
    #[inline]
    fn sample(&mut self) -> FaultSnapshot {
        self()
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Plays back a column-major trace (`trace[channel][step]`), wrapping to
/// the start after the last step.
#[derive(Debug, Clone)]
pub struct ReplaySource<'d, const L: usize> {
    trace: &'d [[bool; L]; CHANNEL_COUNT],
    position: usize,
}

impl<'d, const L: usize> ReplaySource<'d, L> {
    pub const fn new(trace: &'d [[bool; L]; CHANNEL_COUNT]) -> Self {
        Self { trace, position: 0 }
    }

    /// Restart playback from the first step.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Index of the step the next `sample()` returns.
    pub fn position(&self) -> usize {
        self.position
    }

    pub const fn len(&self) -> usize {
        L
    }

    pub const fn is_empty(&self) -> bool {
        L == 0
    }
}

impl<const L: usize> SampleSource for ReplaySource<'_, L> {
    fn sample(&mut self) -> FaultSnapshot {
        if L == 0 {
            return FaultSnapshot::CLEAR;
        }

        let step = self.position;
        self.position = (self.position + 1) % L;

        let mut snapshot = FaultSnapshot::CLEAR;
        for channel in Channel::ALL {
            snapshot.set(channel, self.trace[channel.index()][step]);
        }
        snapshot
    }
}

/// Steps in the reference trace.
pub const REFERENCE_TRACE_LEN: usize = 33;

const T: bool = true;
const F: bool = false;

/// Bench trace used before live inputs are wired up. Each channel latches
/// twice and clears twice, with short non-latching bursts in between.
pub static REFERENCE_TRACE: [[bool; REFERENCE_TRACE_LEN]; CHANNEL_COUNT] = [
    // LCD
    [
        T, T, T, T, T, F, F, F, F, F, T, T, F, T, T, T, F, F, F, F, F, F, F, F, F, F, F, F, F,
        F, F, F, F,
    ],
    // LED
    [
        F, F, F, T, T, T, T, T, F, F, F, T, F, T, F, F, F, T, T, T, F, F, F, F, F, F, F, F, F,
        F, F, F, F,
    ],
    // GMSL
    [
        F, F, F, F, F, F, T, T, T, T, F, F, F, F, F, T, F, T, F, T, T, T, T, T, F, F, F, F, F,
        F, F, F, F,
    ],
];

impl ReplaySource<'static, REFERENCE_TRACE_LEN> {
    /// Replay of [`REFERENCE_TRACE`].
    pub fn reference() -> Self {
        Self::new(&REFERENCE_TRACE)
    }
}
