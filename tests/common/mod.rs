//! Shared fixtures for integration tests.

#![allow(dead_code)]

use core::cell::{Cell, RefCell};

use latchsched::{Scheduler, Task, Tick};

/// Task that counts its runs and records the tick of each.
pub struct Probe<'s> {
    runs: Cell<u32>,
    clock: &'s Cell<Tick>,
    ticks: RefCell<Vec<u32>>,
}

impl<'s> Probe<'s> {
    pub fn new(clock: &'s Cell<Tick>) -> Self {
        Self {
            runs: Cell::new(0),
            clock,
            ticks: RefCell::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> u32 {
        self.runs.get()
    }

    pub fn ticks(&self) -> Vec<u32> {
        self.ticks.borrow().clone()
    }
}

impl Task for Probe<'_> {
    fn run(&self) {
        self.runs.set(self.runs.get() + 1);
        self.ticks.borrow_mut().push(self.clock.get().get());
    }
}

/// Advance `ticks` times, publishing the current tick to `clock` before
/// each advance so probes can read it.
pub fn drive<const N: usize>(scheduler: &mut Scheduler<'_, N>, clock: &Cell<Tick>, ticks: u32) {
    for _ in 0..ticks {
        clock.set(scheduler.now().wrapping_add(1));
        scheduler.advance_tick();
    }
}
