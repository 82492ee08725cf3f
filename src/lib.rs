//! # latchsched
//!
//! A cooperative tick scheduler for bare-metal targets, paired with a
//! latching fault-debounce monitor that runs as one of its tasks.
//!
//! ## Overview
//!
//! Tasks are registered into a fixed-capacity table and run to completion
//! on a single execution context when their due tick arrives. Dispatch
//! resolution is chosen by elapsed time:
//!
//! - **Fine mode** (boot window): the table is scanned every tick
//! - **Coarse mode** (afterwards, for good): once every 10 ticks
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │          Application Tasks · Fault Latch (fault/)       │
//! ├────────────────────────────────────────────────────────┤
//! │                 Kernel wiring (kernel.rs)               │
//! │        register_reference_tasks() · run_ticks()         │
//! ├──────────────┬────────────────────┬───────────────────┤
//! │  Scheduler   │   Mode Controller  │   Tick Source     │
//! │  scheduler.rs│   mode.rs          │   tick.rs         │
//! │  ─ register()│   ─ Fine → Coarse  │   ─ wrap-safe cmp │
//! │  ─ dispatch()│                    │   ─ 10/50 flags   │
//! ├──────────────┴────────────────────┴───────────────────┤
//! │              Task Model (task.rs)                       │
//! │        Task trait · TaskMode · TaskSlot · TaskTable     │
//! ├────────────────────────────────────────────────────────┤
//! │            Arch Port (arch/cortex_m4.rs)                │
//! │        SysTick · pending tick hand-off · wfi            │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use core::cell::Cell;
//! use latchsched::{Scheduler, SchedulerConfig, TaskMode};
//!
//! let runs = Cell::new(0);
//! let blink = || runs.set(runs.get() + 1);
//!
//! let mut scheduler = Scheduler::new(SchedulerConfig::default());
//! scheduler.register(TaskMode::Repeating, &blink, 0, 100).unwrap();
//! for _ in 0..1_000 {
//!     scheduler.advance_tick();
//! }
//! assert_eq!(runs.get(), 10);
//! ```
//!
//! ## Memory Model
//!
//! - **No heap**: task table and channel state are fixed-size arrays
//! - **Borrowed tasks**: the scheduler holds `&dyn Task`, never owns a task
//! - **Interior mutability**: tasks take `&self`; state lives in `Cell`s
//! - **Atomics at the ISR boundary**: boundary flags and pending ticks

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod fault;
pub mod kernel;
pub mod mode;
pub mod scheduler;
pub mod task;
pub mod tick;

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod arch;

pub use config::{LatchConfig, SchedulerConfig};
pub use error::{RegisterError, RegisterResult};
pub use fault::{
    Channel, ChannelState, EventLog, FaultEvent, FaultEventKind, FaultEvents, FaultLatch,
    FaultSink, FaultSnapshot, FaultState, ReplaySource, SampleSource,
};
pub use mode::DispatchMode;
pub use scheduler::{Scheduler, SchedulerStats};
pub use task::{Task, TaskMode};
pub use tick::{Boundary, Tick};
