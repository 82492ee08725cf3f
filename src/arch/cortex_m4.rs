//! # Cortex-M4 Port Layer
//!
//! Hardware tick source for the ARM Cortex-M4. SysTick fires at `TICK_HZ`
//! and only counts; all scheduling happens in the main loop.
//!
//! ## Tick Hand-off
//!
//! ```text
//!   SysTick ISR                    main loop
//!   ───────────                    ─────────
//!   PENDING_TICKS += 1   ──────►   n = take_pending_ticks()
//!   (single writer)                advance_tick() × n
//!                                  (single reader)
//! ```
//!
//! The counter is one `AtomicU32`, so neither side needs a critical
//! section. The scheduler itself is owned by `main` and never touched from
//! interrupt context.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};

use crate::config::{SYSTEM_CLOCK_HZ, TICK_HZ};

/// Ticks counted by the ISR and not yet consumed by the main loop.
static PENDING_TICKS: AtomicU32 = AtomicU32::new(0);

/// Lowest priority on a part with 4 priority bits.
const SYSTICK_PRIORITY: u8 = 0xF0;

// ---------------------------------------------------------------------------
// SysTick configuration
// ---------------------------------------------------------------------------

/// Configure SysTick to fire at `TICK_HZ` from the processor clock.
pub fn configure_systick(syst: &mut SYST) {
    let reload = SYSTEM_CLOCK_HZ / TICK_HZ - 1;
    syst.set_reload(reload);
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Put SysTick at the lowest priority so it never delays application ISRs.
pub fn set_interrupt_priorities(scb: &mut SCB) {
    // SAFETY: changing a handler priority cannot break a priority-based
    // critical section here; SysTick only touches an atomic.
    unsafe {
        scb.set_priority(SystemHandler::SysTick, SYSTICK_PRIORITY);
    }
}

// ---------------------------------------------------------------------------
// Tick hand-off
// ---------------------------------------------------------------------------

/// Consume every tick counted since the last call.
#[inline]
pub fn take_pending_ticks() -> u32 {
    PENDING_TICKS.swap(0, Ordering::AcqRel)
}

/// Sleep until the next interrupt.
#[inline]
pub fn wait_for_interrupt() {
    cortex_m::asm::wfi();
}

// ---------------------------------------------------------------------------
// SysTick handler
// ---------------------------------------------------------------------------

/// SysTick exception handler. Counts one tick and returns.
#[no_mangle]
pub extern "C" fn SysTick() {
    PENDING_TICKS.fetch_add(1, Ordering::Release);
}
