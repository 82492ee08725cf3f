//! # Fault Latch
//!
//! Debounces a fixed set of boolean fault inputs and reports edge
//! transitions. Runs as an ordinary periodic [`Task`] in the scheduler.
//!
//! ## Per-Invocation Sequence
//!
//! 1. **Snapshot**: read every channel at once from the [`SampleSource`]
//! 2. **Update**: feed each channel's sample to its hysteresis state machine,
//!    in [`Channel::ALL`] order
//! 3. **Report**: every transition is logged and handed to the [`FaultSink`]
//!
//! Taking the snapshot before any channel updates means no channel ever
//! sees a mix of readings from different instants.
//!
//! ## Example
//!
//! ```
//! use latchsched::{EventLog, FaultLatch, LatchConfig, ReplaySource, Channel};
//!
//! let events: EventLog<16> = EventLog::new();
//! let latch = FaultLatch::with_sink(LatchConfig::default(), ReplaySource::reference(), &events);
//! for _ in 0..3 {
//!     latch.process();
//! }
//! assert!(latch.is_latched(Channel::Lcd));
//! assert_eq!(events.len(), 1);
//! ```

mod channel;
mod event;
mod source;

use core::cell::{Cell, RefCell};

use heapless::Vec;

use crate::config::LatchConfig;
use crate::task::Task;

pub use channel::{Channel, ChannelState, FaultState, CHANNEL_COUNT};
pub use event::{EventLog, FaultEvent, FaultEventKind, FaultSink};
pub use source::{FaultSnapshot, ReplaySource, SampleSource, REFERENCE_TRACE, REFERENCE_TRACE_LEN};

/// Transitions produced by one invocation. At most one per channel.
pub type FaultEvents = Vec<FaultEvent, CHANNEL_COUNT>;

/// Per-channel hysteresis over a [`SampleSource`].
///
/// All state sits behind `Cell`/`RefCell` so the latch can be registered in
/// the scheduler by shared reference and still be queried between runs.
pub struct FaultLatch<S, K = ()> {
    config: LatchConfig,
    channels: Cell<[ChannelState; CHANNEL_COUNT]>,
    source: RefCell<S>,
    sink: K,
}

impl<S: SampleSource> FaultLatch<S> {
    /// Latch whose events are only logged.
    pub const fn new(config: LatchConfig, source: S) -> Self {
        Self::with_sink(config, source, ())
    }
}

impl<S: SampleSource, K: FaultSink> FaultLatch<S, K> {
    /// Latch that also hands every event to `sink`.
    pub const fn with_sink(config: LatchConfig, source: S, sink: K) -> Self {
        Self {
            config,
            channels: Cell::new([ChannelState::INITIAL; CHANNEL_COUNT]),
            source: RefCell::new(source),
            sink,
        }
    }

    /// Reset every channel to Normal with zeroed counters. The sample
    /// source is left where it is.
    pub fn init(&self) {
        self.channels.set([ChannelState::INITIAL; CHANNEL_COUNT]);
    }

    /// Take one snapshot and run every channel's state machine on it.
    ///
    /// # Returns
    /// The transitions caused by this snapshot, in channel order.
    pub fn process(&self) -> FaultEvents {
        let mut events = FaultEvents::new();

        let snapshot = match self.source.try_borrow_mut() {
            Ok(mut source) => source.sample(),
            Err(_) => {
                log::warn!("fault sample source re-entered, skipping invocation");
                return events;
            }
        };

        let threshold = self.config.effective_threshold();
        let mut channels = self.channels.get();
        for channel in Channel::ALL {
            let state = &mut channels[channel.index()];
            if let Some(kind) = state.observe(snapshot.get(channel), threshold) {
                let event = FaultEvent { channel, kind };
                match kind {
                    FaultEventKind::Detected => log::warn!("{}", event),
                    FaultEventKind::Cleared => log::info!("{}", event),
                }
                // One slot per channel, cannot overflow.
                let _ = events.push(event);
            }
        }
        self.channels.set(channels);

        for event in &events {
            self.sink.report(event);
        }
        events
    }

    #[inline]
    pub fn is_latched(&self, channel: Channel) -> bool {
        self.channel(channel).is_latched()
    }

    pub fn state(&self, channel: Channel) -> FaultState {
        self.channel(channel).state()
    }

    /// Consecutive fault samples, saturating at the threshold.
    pub fn fault_count(&self, channel: Channel) -> u8 {
        self.channel(channel).fault_count()
    }

    /// Consecutive clear samples, saturating at the threshold.
    pub fn clear_count(&self, channel: Channel) -> u8 {
        self.channel(channel).clear_count()
    }

    /// Copy of one channel's state.
    pub fn channel(&self, channel: Channel) -> ChannelState {
        self.channels.get()[channel.index()]
    }

    pub fn threshold(&self) -> u8 {
        self.config.effective_threshold()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Direct access to the source while the latch is not shared.
    pub fn source_mut(&mut self) -> &mut S {
        self.source.get_mut()
    }
}

impl<S: SampleSource, K: FaultSink> Task for FaultLatch<S, K> {
    fn run(&self) {
        self.process();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(samples: &[bool]) -> impl FnMut() -> FaultSnapshot + '_ {
        let mut iter = samples.iter().copied();
        move || FaultSnapshot::from_array([iter.next().unwrap_or(false), false, false])
    }

    #[test]
    fn detect_then_clear_once_each() {
        let samples = [true, true, true, true, false, false, false, false];
        let log: EventLog<8> = EventLog::new();
        let latch = FaultLatch::with_sink(LatchConfig::default(), scripted(&samples), &log);

        let mut transitions = 0;
        for step in 0..samples.len() {
            let events = latch.process();
            transitions += events.len();
            match step {
                2 => assert_eq!(events.as_slice(), &[FaultEvent::detected(Channel::Lcd)]),
                6 => assert_eq!(events.as_slice(), &[FaultEvent::cleared(Channel::Lcd)]),
                _ => assert!(events.is_empty()),
            }
        }
        assert_eq!(transitions, 2);
        assert_eq!(log.len(), 2);
        assert!(!latch.is_latched(Channel::Lcd));
    }

    #[test]
    fn snapshot_drives_all_channels() {
        let latch = FaultLatch::new(LatchConfig::default(), || FaultSnapshot::new(true, false, true));
        for _ in 0..2 {
            assert!(latch.process().is_empty());
        }
        let events = latch.process();
        assert_eq!(
            events.as_slice(),
            &[FaultEvent::detected(Channel::Lcd), FaultEvent::detected(Channel::Gmsl)]
        );
        assert_eq!(latch.state(Channel::Led), FaultState::Normal);
        assert_eq!(latch.clear_count(Channel::Led), 3);
    }

    #[test]
    fn queries_have_no_side_effects() {
        let latch = FaultLatch::new(LatchConfig::default(), || FaultSnapshot::uniform(true));
        latch.process();
        latch.process();
        for _ in 0..5 {
            assert!(!latch.is_latched(Channel::Led));
            assert_eq!(latch.fault_count(Channel::Led), 2);
        }
        latch.process();
        assert!(latch.is_latched(Channel::Led));
    }

    #[test]
    fn init_resets_counters_and_state() {
        let latch = FaultLatch::new(LatchConfig::default(), || FaultSnapshot::uniform(true));
        for _ in 0..4 {
            latch.process();
        }
        assert!(latch.is_latched(Channel::Gmsl));
        latch.init();
        for channel in Channel::ALL {
            assert_eq!(latch.channel(channel), ChannelState::INITIAL);
        }
    }

    #[test]
    fn custom_threshold() {
        let latch = FaultLatch::new(LatchConfig::with_threshold(1), || FaultSnapshot::uniform(true));
        assert_eq!(latch.threshold(), 1);
        assert_eq!(latch.process().len(), CHANNEL_COUNT);
    }

    #[test]
    fn runs_as_a_task() {
        let mut latch = FaultLatch::new(LatchConfig::default(), ReplaySource::reference());
        {
            let task: &dyn Task = &latch;
            for _ in 0..3 {
                task.run();
            }
        }
        assert!(latch.is_latched(Channel::Lcd));
        assert_eq!(latch.source_mut().position(), 3);
        latch.source_mut().rewind();
        assert_eq!(latch.source_mut().position(), 0);
    }
}
