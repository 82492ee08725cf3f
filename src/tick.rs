//! # Tick Source
//!
//! Monotonic tick counter, wraparound-safe time comparison, and the two
//! latched boundary flags (every 10 ticks and every 50 ticks) consumed by
//! the periodic runners.
//!
//! ## Wraparound
//!
//! The counter is a `u32` that wraps silently. Due times are compared by
//! signed difference, so a due time is judged correctly as long as it lies
//! within `i32::MAX` ticks of the current time:
//!
//! ```text
//!   due = u32::MAX - 1          now = 1 (after wrap)
//!   now - due (wrapping) = 3    → as i32 = 3 ≥ 0 → due
//! ```

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::{COARSE_FRAMES_PER_SLOW_FRAME, TICKS_PER_COARSE_FRAME};

// ---------------------------------------------------------------------------
// Tick value
// ---------------------------------------------------------------------------

/// A point on the wrapping tick timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tick(pub u32);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub const fn new(value: u32) -> Self {
        Tick(value)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The tick `ticks` after this one, wrapping at the counter width.
    #[inline]
    pub const fn wrapping_add(self, ticks: u32) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }

    /// Ticks elapsed from `earlier` to `self`, modulo the counter width.
    #[inline]
    pub const fn elapsed_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `true` if `self` is at or after `other` on the wrapping timeline.
    #[inline]
    pub const fn is_at_or_after(self, other: Tick) -> bool {
        time_after_eq(self.0, other.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Overflow-safe comparison: `a` is at or after `b`.
///
/// The difference must be taken in exactly 32 bits and reinterpreted as
/// `i32`; widening first would lose the wrap.
#[inline]
pub const fn time_after_eq(a: u32, b: u32) -> bool {
    (a.wrapping_sub(b) as i32) >= 0
}

// ---------------------------------------------------------------------------
// Boundary flags
// ---------------------------------------------------------------------------

/// The two frame boundaries raised by the tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Every `TICKS_PER_COARSE_FRAME` ticks.
    TenTicks,
    /// Every `COARSE_FRAMES_PER_SLOW_FRAME` coarse frames.
    FiftyTicks,
}

/// Latched set-until-consumed boundary flags.
///
/// Written only by the tick advance, read and cleared only by the periodic
/// runners. Each flag is a single `AtomicBool` so the writer may be an
/// interrupt and the reader the main loop.
#[derive(Debug)]
pub struct BoundaryFlags {
    ten: AtomicBool,
    fifty: AtomicBool,
}

impl BoundaryFlags {
    pub const fn new() -> Self {
        Self {
            ten: AtomicBool::new(false),
            fifty: AtomicBool::new(false),
        }
    }

    fn flag(&self, boundary: Boundary) -> &AtomicBool {
        match boundary {
            Boundary::TenTicks => &self.ten,
            Boundary::FiftyTicks => &self.fifty,
        }
    }

    pub fn raise(&self, boundary: Boundary) {
        self.flag(boundary).store(true, Ordering::Release);
    }

    /// Read and clear. Returns `true` at most once per raise.
    pub fn take(&self, boundary: Boundary) -> bool {
        self.flag(boundary).swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming.
    pub fn is_raised(&self, boundary: Boundary) -> bool {
        self.flag(boundary).load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.ten.store(false, Ordering::Release);
        self.fifty.store(false, Ordering::Release);
    }
}

impl Default for BoundaryFlags {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tick source
// ---------------------------------------------------------------------------

/// Boundaries crossed by one call to [`TickSource::accumulate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameEdges {
    pub ten: bool,
    pub fifty: bool,
}

/// Tick counter plus the frame accumulators. Knows nothing about tasks.
#[derive(Debug)]
pub struct TickSource {
    now: Tick,
    /// Base ticks since the last 10-tick boundary.
    tick_acc: u8,
    /// 10-tick boundaries since the last 50-tick boundary.
    frame_acc: u8,
    flags: BoundaryFlags,
}

impl TickSource {
    pub const fn new() -> Self {
        Self {
            now: Tick::ZERO,
            tick_acc: 0,
            frame_acc: 0,
            flags: BoundaryFlags::new(),
        }
    }

    /// Back to tick zero with empty accumulators and cleared flags.
    pub fn reset(&mut self) {
        self.now = Tick::ZERO;
        self.tick_acc = 0;
        self.frame_acc = 0;
        self.flags.clear();
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn flags(&self) -> &BoundaryFlags {
        &self.flags
    }

    /// Advance the counter by one tick. Wraps silently.
    #[inline]
    pub fn increment(&mut self) -> Tick {
        self.now = self.now.wrapping_add(1);
        self.now
    }

    /// Feed the current tick into the frame accumulators, raising the
    /// boundary flags that were crossed.
    pub fn accumulate(&mut self) -> FrameEdges {
        let mut edges = FrameEdges::default();

        self.tick_acc += 1;
        if self.tick_acc >= TICKS_PER_COARSE_FRAME {
            self.tick_acc = 0;
            self.flags.raise(Boundary::TenTicks);
            edges.ten = true;

            self.frame_acc += 1;
            if self.frame_acc >= COARSE_FRAMES_PER_SLOW_FRAME {
                self.frame_acc = 0;
                self.flags.raise(Boundary::FiftyTicks);
                edges.fifty = true;
            }
        }

        edges
    }

    /// Jump the counter without touching the accumulators.
    pub(crate) fn set_now(&mut self, tick: Tick) {
        self.now = tick;
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}
