//! Registration errors.
//!
//! The dispatch path itself never fails: the only fallible operation is
//! claiming a slot in the task table.

use thiserror_no_std::Error;

/// Result of a task registration.
pub type RegisterResult = Result<(), RegisterError>;

/// Why a task was not registered. Nothing in the table changes on error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// Every slot is active.
    #[error("task table full ({capacity} slots)")]
    CapacityExhausted {
        capacity: usize,
    },

    /// A delay or period that the due-time comparison cannot represent.
    #[error("invalid task argument: {reason}")]
    InvalidArgument {
        reason: &'static str,
    },
}
