//! # latchsched Configuration
//!
//! Compile-time constants governing the scheduler, the fault latch and the
//! firmware port, plus the small runtime config structs built from them.
//! All limits are fixed at compile time: no dynamic allocation.

/// Default number of task slots in the scheduler's table.
pub const TASK_CAPACITY: usize = 10;

/// Number of ticks after start during which the scheduler dispatches on
/// every tick (Fine mode). Once the tick counter exceeds this value the
/// scheduler drops to one dispatch per coarse frame for good.
pub const DEFAULT_BOOT_WINDOW_TICKS: u32 = 10_000;

/// Base ticks per coarse frame (the "10 ms" boundary at 1 kHz).
pub const TICKS_PER_COARSE_FRAME: u8 = 10;

/// Coarse frames per slow frame (the "50 ms" boundary at 1 kHz).
pub const COARSE_FRAMES_PER_SLOW_FRAME: u8 = 5;

/// Largest delay or period accepted at registration.
///
/// Due times are compared by signed difference, so anything further than
/// half the counter range ahead would already look overdue.
pub const MAX_DELAY_TICKS: u32 = i32::MAX as u32;

/// Consecutive identical samples needed to latch or clear a fault.
pub const DEFAULT_LATCH_THRESHOLD: u8 = 3;

/// SysTick frequency in Hz. One tick is one millisecond.
pub const TICK_HZ: u32 = 1000;

/// System clock frequency in Hz (STM32F4 at 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// Delay before the reference boot one-shot runs.
pub const BOOT_TASK_DELAY_TICKS: u32 = 5_000;

/// Delay before the fault latch is first sampled.
pub const FAULT_TASK_DELAY_TICKS: u32 = 2_000;

/// Sampling period of the fault latch in the reference deployment.
pub const FAULT_TASK_PERIOD_TICKS: u32 = 1_000;

/// Runtime scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Fine mode stays active while `now <= boot_window_ticks`.
    pub boot_window_ticks: u32,
}

impl SchedulerConfig {
    pub const fn new() -> Self {
        Self {
            boot_window_ticks: DEFAULT_BOOT_WINDOW_TICKS,
        }
    }

    pub const fn with_boot_window(boot_window_ticks: u32) -> Self {
        Self { boot_window_ticks }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime fault latch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatchConfig {
    /// Consecutive samples required for a transition. Zero is treated as one.
    pub threshold: u8,
}

impl LatchConfig {
    pub const fn new() -> Self {
        Self {
            threshold: DEFAULT_LATCH_THRESHOLD,
        }
    }

    pub const fn with_threshold(threshold: u8) -> Self {
        Self { threshold }
    }

    /// The threshold actually applied by the latch.
    #[inline]
    pub const fn effective_threshold(&self) -> u8 {
        if self.threshold > 0 {
            self.threshold
        } else {
            1
        }
    }
}

impl Default for LatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        assert_eq!(SchedulerConfig::default().boot_window_ticks, DEFAULT_BOOT_WINDOW_TICKS);
        assert_eq!(LatchConfig::default().effective_threshold(), DEFAULT_LATCH_THRESHOLD);
    }

    #[test]
    fn zero_threshold_is_clamped() {
        assert_eq!(LatchConfig::with_threshold(0).effective_threshold(), 1);
        assert_eq!(LatchConfig::with_threshold(5).effective_threshold(), 5);
    }
}
