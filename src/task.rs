//! # Task Model
//!
//! Defines the unit of work the scheduler runs and the fixed-capacity slot
//! table that records it.
//!
//! ## Task Contract
//!
//! A task is anything implementing [`Task`]: it takes `&self`, runs to
//! completion, and must not block. Tasks that keep state use interior
//! mutability (`Cell`, `RefCell`), which lets the scheduler hold a shared
//! borrow while other code still reads the task's state.
//!
//! ## Slot Lifecycle
//!
//! ```text
//!   ┌──────────┐     claim()      ┌────────┐
//!   │ Inactive │ ───────────────► │ Active │ ──┐ run, re-arm
//!   └──────────┘                  └────────┘ ◄─┘ (Repeating, period > 0)
//!        ▲                            │
//!        │   release()                │
//!        │   (OneShot done, period 0, │
//!        │    explicit unregister)    │
//!        └────────────────────────────┘
//! ```

use crate::config::MAX_DELAY_TICKS;
use crate::error::RegisterError;
use crate::tick::Tick;

// ---------------------------------------------------------------------------
// Task trait
// ---------------------------------------------------------------------------

/// A periodic or one-shot unit of work.
///
/// `run` executes synchronously on the scheduler's context and must be
/// bounded in duration: the scheduler has no timeout or preemption, so a
/// long task delays every other due task.
pub trait Task {
    fn run(&self);
}

impl<F: Fn()> Task for F {
    #[inline]
    fn run(&self) {
        self()
    }
}

/// How a slot behaves after its task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMode {
    /// Runs once, then the slot is released.
    OneShot,
    /// Re-armed to `now + period` after each run.
    ///
    /// A period of zero does **not** mean "every tick": the task runs once
    /// and the slot is released, exactly like [`TaskMode::OneShot`].
    Repeating,
}

// ---------------------------------------------------------------------------
// Task slot
// ---------------------------------------------------------------------------

/// One entry in the task table. Active iff it holds a task.
#[derive(Clone, Copy)]
pub struct TaskSlot<'a> {
    task: Option<&'a dyn Task>,
    mode: TaskMode,
    due: Tick,
    period: u32,
}

impl<'a> TaskSlot<'a> {
    pub const EMPTY: TaskSlot<'a> = TaskSlot {
        task: None,
        mode: TaskMode::OneShot,
        due: Tick::ZERO,
        period: 0,
    };

    #[inline]
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub fn mode(&self) -> TaskMode {
        self.mode
    }

    pub fn due(&self) -> Tick {
        self.due
    }

    /// Zero for one-shot tasks.
    pub fn period(&self) -> u32 {
        self.period
    }

    /// The task, if this slot should run at `now`.
    #[inline]
    pub fn due_task(&self, now: Tick) -> Option<&'a dyn Task> {
        self.task.filter(|_| now.is_at_or_after(self.due))
    }
}

impl core::fmt::Debug for TaskSlot<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskSlot")
            .field("active", &self.is_active())
            .field("mode", &self.mode)
            .field("due", &self.due)
            .field("period", &self.period)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Task table
// ---------------------------------------------------------------------------

/// Fixed-size array of slots (no heap). Slot indices stay internal to the
/// crate; callers never get a handle back.
pub struct TaskTable<'a, const N: usize> {
    slots: [TaskSlot<'a>; N],
}

impl<'a, const N: usize> TaskTable<'a, N> {
    pub const fn new() -> Self {
        Self {
            slots: [TaskSlot::EMPTY; N],
        }
    }

    /// Release every slot.
    pub fn clear(&mut self) {
        self.slots = [TaskSlot::EMPTY; N];
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(TaskSlot::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskSlot<'a>> {
        self.slots.iter()
    }

    /// Claim the lowest-index free slot.
    ///
    /// # Returns
    /// - `Ok(index)` of the claimed slot
    /// - `Err(InvalidArgument)` if `delay` or `period` exceeds `MAX_DELAY_TICKS`
    /// - `Err(CapacityExhausted)` if every slot is active
    pub fn claim(
        &mut self,
        mode: TaskMode,
        task: &'a dyn Task,
        now: Tick,
        delay: u32,
        period: u32,
    ) -> Result<usize, RegisterError> {
        if delay > MAX_DELAY_TICKS {
            return Err(RegisterError::InvalidArgument {
                reason: "initial delay exceeds half the tick range",
            });
        }

        let period = match mode {
            TaskMode::OneShot => 0,
            TaskMode::Repeating if period > MAX_DELAY_TICKS => {
                return Err(RegisterError::InvalidArgument {
                    reason: "period exceeds half the tick range",
                });
            }
            TaskMode::Repeating => period,
        };

        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_active())
            .ok_or(RegisterError::CapacityExhausted { capacity: N })?;

        self.slots[index] = TaskSlot {
            task: Some(task),
            mode,
            due: now.wrapping_add(delay),
            period,
        };
        Ok(index)
    }

    /// Deactivate a slot and drop its task reference. Out-of-range is a no-op.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.task = None;
        }
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&TaskSlot<'a>> {
        self.slots.get(index)
    }

    pub(crate) fn rearm(&mut self, index: usize, due: Tick) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.due = due;
        }
    }
}

impl<const N: usize> Default for TaskTable<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
