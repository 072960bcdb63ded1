//! Bus-Fault Errors.
//!
//! A bus fault is a failure reported by the host memory system: a reference
//! to non-existent memory or a word transfer at an odd address. Faults abort
//! the current floating-point instruction without touching FPS, unlike
//! architectural floating-point traps, which are status updates recorded in
//! FEC/FEA and signalled through the CPU trap mask.

use crate::common::addr::VirtAddr;

/// Memory fault raised by the host during operand transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusFault {
    /// Reference to an address with no memory behind it.
    NonExistent(VirtAddr),

    /// Word transfer attempted at an odd byte address.
    OddAddress(VirtAddr),
}

impl std::fmt::Display for BusFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusFault::NonExistent(addr) => write!(f, "non-existent memory at {}", addr),
            BusFault::OddAddress(addr) => write!(f, "odd address trap at {}", addr),
        }
    }
}

impl std::error::Error for BusFault {}
