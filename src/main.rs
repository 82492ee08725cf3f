//! # latchsched Reference Firmware
//!
//! Runs the reference task set on a Cortex-M4:
//!
//! | Task | Mode | First run | Period | Behavior |
//! |------|------|-----------|--------|----------|
//! | `boot_check` | OneShot | 5 s | none | Logs that start-up checks finished |
//! | `fault_latch` | Repeating | 2 s | 1 s | Debounces the LCD/LED/GMSL fault lines |
//!
//! The fault inputs come from the bench replay trace until live GPIO
//! sampling is wired in. Build with `--features firmware` for a
//! `thumbv7em-none-eabihf` target.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;

use latchsched::arch::cortex_m4;
use latchsched::{kernel, FaultLatch, LatchConfig, ReplaySource, Scheduler, SchedulerConfig};

#[entry]
fn main() -> ! {
    let Some(mut cp) = cortex_m::Peripherals::take() else {
        loop {
            cortex_m4::wait_for_interrupt();
        }
    };

    let boot_check = || log::info!("boot checks complete");
    let fault_latch = FaultLatch::new(LatchConfig::default(), ReplaySource::reference());

    let mut scheduler = Scheduler::new(SchedulerConfig::default());
    if let Err(err) = kernel::register_reference_tasks(&mut scheduler, &boot_check, &fault_latch) {
        log::warn!("running without reference tasks: {}", err);
    }

    cortex_m4::set_interrupt_priorities(&mut cp.SCB);
    cortex_m4::configure_systick(&mut cp.SYST);

    loop {
        for _ in 0..cortex_m4::take_pending_ticks() {
            scheduler.advance_tick();
        }
        // Driver buckets (button debounce at 10 ms, ADC at 50 ms) hook in here.
        scheduler.run_periodic(|| {}, || {});
        cortex_m4::wait_for_interrupt();
    }
}
