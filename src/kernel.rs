//! # Kernel
//!
//! Wiring for the reference deployment: which tasks are registered at boot
//! and how the tick loop is driven when no hardware timer is present.
//!
//! ## Startup Sequence
//!
//! ```text
//! reset_handler (cortex-m-rt)
//!   └─► main()
//!         ├─► Scheduler::new()              ← Tick zero, Fine mode
//!         ├─► register_reference_tasks()    ← Boot one-shot, fault latch
//!         ├─► configure_systick()           ← 1 kHz tick interrupt
//!         └─► loop
//!               ├─► advance_tick() × pending ticks
//!               ├─► run_periodic()          ← 10/50-tick runners
//!               └─► wfi
//! ```

use crate::config::{BOOT_TASK_DELAY_TICKS, FAULT_TASK_DELAY_TICKS, FAULT_TASK_PERIOD_TICKS};
use crate::error::RegisterResult;
use crate::scheduler::Scheduler;
use crate::task::{Task, TaskMode};

/// Register the reference task set:
///
/// | Task | Mode | First run | Period |
/// |------|------|-----------|--------|
/// | `boot` | OneShot | `BOOT_TASK_DELAY_TICKS` | none |
/// | `fault_latch` | Repeating | `FAULT_TASK_DELAY_TICKS` | `FAULT_TASK_PERIOD_TICKS` |
///
/// Stops at the first registration that fails.
pub fn register_reference_tasks<'a, const N: usize>(
    scheduler: &mut Scheduler<'a, N>,
    boot: &'a dyn Task,
    fault_latch: &'a dyn Task,
) -> RegisterResult {
    scheduler.register(TaskMode::OneShot, boot, BOOT_TASK_DELAY_TICKS, 0)?;
    scheduler.register(
        TaskMode::Repeating,
        fault_latch,
        FAULT_TASK_DELAY_TICKS,
        FAULT_TASK_PERIOD_TICKS,
    )?;
    log::info!(
        "reference tasks registered ({} of {} slots in use)",
        scheduler.active_tasks(),
        scheduler.capacity()
    );
    Ok(())
}

/// Host stand-in for the tick interrupt: advance `ticks` times, polling
/// the periodic runners after each tick as the main loop would.
///
/// # Returns
/// The number of task runs over the whole span.
pub fn run_ticks<const N: usize, T, F>(
    scheduler: &mut Scheduler<'_, N>,
    ticks: u32,
    mut on_ten: T,
    mut on_fifty: F,
) -> usize
where
    T: FnMut(),
    F: FnMut(),
{
    let mut ran = 0;
    for _ in 0..ticks {
        ran += scheduler.advance_tick();
        scheduler.run_periodic(&mut on_ten, &mut on_fifty);
    }
    ran
}
