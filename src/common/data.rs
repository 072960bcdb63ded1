//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used by the
//! operand-addressing logic. The access type is handed to the host's
//! address-resolution callback so its memory management unit can validate
//! permissions before the transfer happens.

/// Type of memory access operation.
///
/// Distinguishes plain reads, plain writes, and read-modify-write accesses
/// for proper permission checking on the host side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data read access.
    Read,

    /// Data write access.
    Write,

    /// Read-modify-write access.
    ///
    /// Used by instructions that read an operand and later write the
    /// result back to the same location. The address is resolved once and
    /// captured for the write-back.
    Modify,
}
