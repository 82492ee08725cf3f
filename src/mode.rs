//! # Mode Controller
//!
//! Decides the dispatch resolution. During the boot window the scheduler
//! dispatches on every tick; once the tick counter exceeds the window it
//! falls back to one dispatch per 10-tick frame. The transition is one-way.
//!
//! ```text
//!   ┌──────┐   now > boot_window   ┌────────┐
//!   │ Fine │ ────────────────────► │ Coarse │
//!   └──────┘                       └────────┘
//! ```

use crate::tick::Tick;

/// Dispatch resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Dispatch every tick.
    Fine,
    /// Dispatch every `TICKS_PER_COARSE_FRAME` ticks.
    Coarse,
}

#[derive(Debug, Clone, Copy)]
pub struct ModeController {
    mode: DispatchMode,
    boot_window: u32,
}

impl ModeController {
    pub const fn new(boot_window: u32) -> Self {
        Self {
            mode: DispatchMode::Fine,
            boot_window,
        }
    }

    /// Re-enter Fine mode. Only scheduler re-initialization calls this.
    pub fn reset(&mut self) {
        self.mode = DispatchMode::Fine;
    }

    /// Apply the tick just counted. Returns `true` on the one call that
    /// leaves Fine mode.
    pub fn update(&mut self, now: Tick) -> bool {
        if self.mode == DispatchMode::Fine && now.get() > self.boot_window {
            self.mode = DispatchMode::Coarse;
            return true;
        }
        false
    }

    #[inline]
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    #[inline]
    pub fn is_fine(&self) -> bool {
        self.mode == DispatchMode::Fine
    }

    pub fn boot_window(&self) -> u32 {
        self.boot_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_fine_mode_after_window() {
        let mut ctl = ModeController::new(3);
        assert!(!ctl.update(Tick(1)));
        assert!(!ctl.update(Tick(3)));
        assert!(ctl.is_fine());
        assert!(ctl.update(Tick(4)));
        assert_eq!(ctl.mode(), DispatchMode::Coarse);
    }

    #[test]
    fn transition_is_one_way() {
        let mut ctl = ModeController::new(10);
        assert!(ctl.update(Tick(11)));
        // A wrapped counter is small again, but Fine mode never returns.
        assert!(!ctl.update(Tick(0)));
        assert!(!ctl.update(Tick(5)));
        assert_eq!(ctl.mode(), DispatchMode::Coarse);
    }

    #[test]
    fn reset_restores_fine() {
        let mut ctl = ModeController::new(0);
        ctl.update(Tick(1));
        ctl.reset();
        assert!(ctl.is_fine());
        assert_eq!(ctl.boot_window(), 0);
    }
}
