//! FP11 Core.
//!
//! The floating-point processor proper: state and dispatch, the host bus
//! contract, operand addressing, status-register definitions, and the
//! arithmetic and conversion units.

/// Host bus contract consumed by the core.
pub mod bus;

/// Processor state and instruction dispatch.
pub mod fpp;

/// Operand addressing and transfer.
pub mod operand;

/// FPS bit and FEC code constants.
pub mod status;

/// Arithmetic and conversion units.
pub mod units;

pub use bus::FppBus;
pub use fpp::Fpp;
pub use operand::OperandRef;
