//! # Scheduler
//!
//! Cooperative, run-to-completion dispatcher over a fixed-capacity task
//! table, driven by a wrapping tick counter.
//!
//! ## Per-Tick Sequence
//!
//! Each call to [`Scheduler::advance_tick`]:
//! 1. **Count**: increment the tick counter (wraps silently)
//! 2. **Mode check**: leave Fine mode for good once `now > boot_window`
//! 3. **Fine dispatch**: in Fine mode, run the dispatch loop every tick
//! 4. **10-tick frame**: raise the 10-tick flag; in Coarse mode, run the
//!    dispatch loop here instead
//! 5. **50-tick frame**: every fifth 10-tick frame, raise the 50-tick flag
//!
//! ## Dispatch Loop
//!
//! Slots are scanned in index order. A slot whose due time has arrived runs
//! once, then:
//!
//! | Mode | Period | After run |
//! |------|--------|-----------|
//! | OneShot | (ignored) | slot released |
//! | Repeating | > 0 | due = now + period |
//! | Repeating | 0 | slot released, same as OneShot |
//!
//! Re-arming is relative to `now`, not to the old due time: if dispatch was
//! held off for several periods the task fires once and the missed periods
//! are dropped. Callers can rely on at most one run per slot per dispatch,
//! never on a fixed run count over elapsed time.

use crate::config::{SchedulerConfig, TASK_CAPACITY};
use crate::error::RegisterResult;
use crate::mode::{DispatchMode, ModeController};
use crate::task::{Task, TaskMode, TaskTable};
use crate::tick::{Boundary, BoundaryFlags, Tick, TickSource};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Counters for diagnostics. All wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Dispatch loop passes.
    pub dispatch_passes: u32,
    /// Task invocations across all passes.
    pub task_runs: u32,
    /// Slots released after their final run.
    pub retired: u32,
    /// Registrations that returned an error.
    pub rejected_registrations: u32,
}

impl SchedulerStats {
    pub const fn new() -> Self {
        Self {
            dispatch_passes: 0,
            task_runs: 0,
            retired: 0,
            rejected_registrations: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduler struct
// ---------------------------------------------------------------------------

/// The scheduler: tick source, mode controller and task table in one owned
/// value.
///
/// `'a` is the lifetime of the registered tasks; the scheduler only borrows
/// them. `N` is the table capacity.
pub struct Scheduler<'a, const N: usize = TASK_CAPACITY> {
    config: SchedulerConfig,
    clock: TickSource,
    mode: ModeController,
    tasks: TaskTable<'a, N>,
    stats: SchedulerStats,
}

impl<'a> Scheduler<'a> {
    /// Scheduler with the default table capacity.
    pub const fn new(config: SchedulerConfig) -> Self {
        Self::with_slots(config)
    }
}

impl<'a, const N: usize> Scheduler<'a, N> {
    /// Scheduler with `N` task slots.
    pub const fn with_slots(config: SchedulerConfig) -> Self {
        Self {
            config,
            clock: TickSource::new(),
            mode: ModeController::new(config.boot_window_ticks),
            tasks: TaskTable::new(),
            stats: SchedulerStats::new(),
        }
    }

    /// Reset to the initial state: tick zero, Fine mode, no flags, empty
    /// table, zeroed statistics.
    pub fn init(&mut self) {
        self.clock.reset();
        self.mode.reset();
        self.tasks.clear();
        self.stats = SchedulerStats::new();
        log::debug!(
            "scheduler initialised: {} slots, boot window {} ticks",
            N,
            self.config.boot_window_ticks
        );
    }

    /// Register a task.
    ///
    /// The first run is due at `now + initial_delay`. `period` applies to
    /// [`TaskMode::Repeating`] only and is ignored for one-shots. A
    /// repeating task with period 0 runs once and is then retired.
    ///
    /// No handle is returned. On error nothing in the table changes, so a
    /// caller that wants the silent-drop behaviour may ignore the result.
    pub fn register(
        &mut self,
        mode: TaskMode,
        task: &'a dyn Task,
        initial_delay: u32,
        period: u32,
    ) -> RegisterResult {
        let now = self.clock.now();
        match self.tasks.claim(mode, task, now, initial_delay, period) {
            Ok(index) => {
                log::debug!(
                    "task registered in slot {}: {:?}, due {}, period {}",
                    index,
                    mode,
                    now.wrapping_add(initial_delay),
                    period
                );
                Ok(())
            }
            Err(err) => {
                self.stats.rejected_registrations = self.stats.rejected_registrations.wrapping_add(1);
                log::warn!("task registration rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Release a slot. Crate-internal: callers have no slot handles.
    pub(crate) fn unregister(&mut self, index: usize) {
        self.tasks.release(index);
    }

    /// Count one tick and dispatch if the current mode says so.
    ///
    /// # Returns
    /// The number of tasks run during this tick.
    pub fn advance_tick(&mut self) -> usize {
        let now = self.clock.increment();

        if self.mode.update(now) {
            log::info!(
                "boot window of {} ticks elapsed at tick {}, switching to coarse dispatch",
                self.mode.boot_window(),
                now
            );
        }

        let mut ran = 0;
        if self.mode.is_fine() {
            ran += self.dispatch_if_due();
        }

        let edges = self.clock.accumulate();
        if edges.ten && !self.mode.is_fine() {
            ran += self.dispatch_if_due();
        }

        ran
    }

    /// Run every task whose due time has arrived, then re-arm or retire it.
    ///
    /// # Returns
    /// The number of tasks run.
    pub fn dispatch_if_due(&mut self) -> usize {
        let now = self.clock.now();
        let mut ran = 0;

        for index in 0..N {
            let (task, mode, period) = match self.tasks.slot(index) {
                Some(slot) => match slot.due_task(now) {
                    Some(task) => (task, slot.mode(), slot.period()),
                    None => continue,
                },
                None => break,
            };

            task.run();
            ran += 1;

            match mode {
                TaskMode::Repeating if period > 0 => {
                    self.tasks.rearm(index, now.wrapping_add(period));
                }
                _ => {
                    self.unregister(index);
                    self.stats.retired = self.stats.retired.wrapping_add(1);
                    log::debug!("slot {} retired at tick {}", index, now);
                }
            }
        }

        self.stats.dispatch_passes = self.stats.dispatch_passes.wrapping_add(1);
        self.stats.task_runs = self.stats.task_runs.wrapping_add(ran as u32);
        ran
    }

    /// Periodic runner: if `boundary` has been crossed since the last call,
    /// clear its flag and run `work` once.
    ///
    /// # Returns
    /// `true` if `work` ran.
    pub fn run_on_boundary<F: FnOnce()>(&self, boundary: Boundary, work: F) -> bool {
        if self.clock.flags().take(boundary) {
            work();
            true
        } else {
            false
        }
    }

    /// Run both periodic runners, 10-tick first.
    pub fn run_periodic<T, F>(&self, on_ten: T, on_fifty: F)
    where
        T: FnOnce(),
        F: FnOnce(),
    {
        self.run_on_boundary(Boundary::TenTicks, on_ten);
        self.run_on_boundary(Boundary::FiftyTicks, on_fifty);
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    #[inline]
    pub fn mode(&self) -> DispatchMode {
        self.mode.mode()
    }

    #[inline]
    pub fn is_fine_mode(&self) -> bool {
        self.mode.is_fine()
    }

    /// Boundary flags, for runners living in another execution context.
    pub fn flags(&self) -> &BoundaryFlags {
        self.clock.flags()
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.active_count()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn is_full(&self) -> bool {
        self.tasks.is_full()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Move the tick counter, for exercising wraparound.
    #[cfg(test)]
    pub(crate) fn set_now(&mut self, tick: Tick) {
        self.clock.set_now(tick);
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &TaskTable<'a, N> {
        &self.tasks
    }
}
