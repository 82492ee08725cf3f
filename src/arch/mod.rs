//! # Architecture Abstraction Layer
//!
//! Hardware tick source for bare-metal targets. Currently implements the
//! Cortex-M4 port; host builds drive the scheduler directly instead.

pub mod cortex_m4;
