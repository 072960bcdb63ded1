//! Host Bus Contract.
//!
//! This module defines the interface the FP11 core consumes from its host
//! processor. The core never touches memory or general registers directly:
//! operand addresses are resolved by the host (which owns the addressing
//! modes, the general registers, and the memory management unit), and all
//! transfers go through single-word read and write callbacks that may fault.

use crate::common::{AccessType, BusFault, VirtAddr};

/// Interface between the FP11 core and the host processor.
///
/// Implemented by the CPU side of the machine. Every method is synchronous;
/// a returned `BusFault` aborts the current floating-point instruction with
/// FPS untouched.
pub trait FppBus {
    /// Resolves a PDP-11 addressing-mode specifier to a virtual address.
    ///
    /// Advances the named general register for the auto-increment and
    /// auto-decrement modes using `bytes` as the operand length. Immediate
    /// mode (`(PC)+`) always steps the PC by 2 regardless of operand size;
    /// the core passes `bytes = 2` in that case. Register mode never
    /// reaches this call: the core resolves its own accumulators.
    ///
    /// # Arguments
    ///
    /// * `spec` - The low six instruction bits (3 mode bits, 3 register bits)
    /// * `access` - Whether the operand will be read, written, or both
    /// * `bytes` - Operand length used to step auto-increment/decrement
    fn virtual_for_mode(
        &mut self,
        spec: u16,
        access: AccessType,
        bytes: u16,
    ) -> Result<VirtAddr, BusFault>;

    /// Reads one 16-bit word at an I/D virtual address.
    fn read_word(&mut self, addr: VirtAddr) -> Result<u16, BusFault>;

    /// Writes one 16-bit word at an I/D virtual address.
    fn write_word(&mut self, addr: VirtAddr, value: u16) -> Result<(), BusFault>;

    /// Reads a general register (r0-r7; r7 is the PC).
    fn reg(&self, index: usize) -> u16;

    /// Writes a general register.
    fn set_reg(&mut self, index: usize, value: u16);

    /// Copies condition-code bits into the CPU flag register.
    ///
    /// Only the bits selected by `mask` are replaced.
    fn set_flags(&mut self, mask: u16, value: u16);

    /// Signals the CPU that a floating-point trap is pending.
    ///
    /// The trap is delivered by the CPU at the next instruction boundary.
    /// Raising the signal twice within one instruction is harmless.
    fn raise_fpp_trap(&mut self);
}
