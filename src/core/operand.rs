//! Operand Addressing.
//!
//! Glue between the instruction's six-bit addressing field and the host
//! bus. Register mode selects the FP accumulators for floating operands
//! and the CPU general registers for integer operands; every other mode is
//! resolved by the host to a 17-bit I/D virtual address, and the value is
//! transferred one word at a time. Immediate mode (`(PC)+`) carries a
//! single-word short literal that fills the high end of a floating value.
//!
//! Reads detect the reserved undefined-variable encoding and report it to
//! the dispatcher, which decides whether the trap fires before or after the
//! operation. Read-modify-write instructions get back an [`OperandRef`]
//! describing where the operand came from, so the write-back reuses the
//! virtual address captured here instead of resolving the mode twice.

use crate::common::{AccessType, BusFault, VirtAddr};
use crate::core::bus::FppBus;
use crate::core::fpp::Fpp;
use crate::core::status;
use crate::core::units::frac;

/// Where a floating operand came from, for write-back after
/// read-modify-write.
#[derive(Clone, Copy, Debug)]
pub enum OperandRef {
    /// An FP accumulator (register mode).
    Ac(usize),
    /// A run of words in memory starting at a captured virtual address.
    Mem { addr: VirtAddr, words: usize },
}

/// A fetched floating operand: its origin plus whether it carried the
/// undefined-variable encoding. The value itself lands in the operand
/// buffer of the FPP state.
pub struct FpOperand {
    pub place: OperandRef,
    pub undefined: bool,
}

/// Destination of an integer store.
pub(crate) enum IntPlace {
    /// A CPU general register (16-bit).
    Reg(usize),
    /// One or two words in memory, high word first.
    Mem { addr: VirtAddr, words: usize },
}

fn is_immediate(spec: u16) -> bool {
    spec & 0o77 == 0o27
}

/// Fetches a floating operand at the active precision into the operand
/// buffer.
///
/// Returns `None` when register mode named an illegal accumulator, in
/// which case the illegal-opcode trap has already been raised.
pub(crate) fn read_fp(
    fpp: &mut Fpp,
    bus: &mut dyn FppBus,
    instr: u16,
    access: AccessType,
) -> Result<Option<FpOperand>, BusFault> {
    let p = fpp.precision();
    let reg = (instr & 7) as usize;
    fpp.scratch = [0; 4];
    if instr & 0o70 == 0 {
        if reg > 5 {
            fpp.trap(bus, status::FEC_ILLEGAL_OP);
            return Ok(None);
        }
        fpp.scratch[..p].copy_from_slice(&fpp.ac[reg][..p]);
        return Ok(Some(FpOperand {
            place: OperandRef::Ac(reg),
            undefined: false,
        }));
    }
    let (words, bytes) = if is_immediate(instr) {
        (1, 2)
    } else {
        (p, p as u16 * 2)
    };
    let addr = bus.virtual_for_mode(instr & 0o77, access, bytes)?;
    let mut at = addr;
    for i in 0..words {
        fpp.scratch[i] = bus.read_word(at)?;
        at = at.step();
    }
    let undefined = frac::is_undefined(&fpp.scratch);
    Ok(Some(FpOperand {
        place: OperandRef::Mem { addr, words },
        undefined,
    }))
}

/// Resolves a floating destination and stores `n` there at the active
/// precision. Returns whether the store happened (register mode with an
/// illegal accumulator traps and stores nothing).
pub(crate) fn write_fp(
    fpp: &mut Fpp,
    bus: &mut dyn FppBus,
    instr: u16,
    n: &[u16; 4],
) -> Result<bool, BusFault> {
    let p = fpp.precision();
    let reg = (instr & 7) as usize;
    if instr & 0o70 == 0 {
        if reg > 5 {
            fpp.trap(bus, status::FEC_ILLEGAL_OP);
            return Ok(false);
        }
        fpp.ac[reg][..p].copy_from_slice(&n[..p]);
        return Ok(true);
    }
    let (words, bytes) = if is_immediate(instr) {
        (1, 2)
    } else {
        (p, p as u16 * 2)
    };
    let addr = bus.virtual_for_mode(instr & 0o77, AccessType::Write, bytes)?;
    write_words(bus, addr, &n[..words])?;
    Ok(true)
}

/// Stores `n` back to a previously captured operand location.
pub(crate) fn write_back(
    fpp: &mut Fpp,
    bus: &mut dyn FppBus,
    place: &OperandRef,
    n: &[u16; 4],
) -> Result<(), BusFault> {
    match *place {
        OperandRef::Ac(reg) => {
            let p = fpp.precision();
            fpp.ac[reg][..p].copy_from_slice(&n[..p]);
            Ok(())
        }
        OperandRef::Mem { addr, words } => write_words(bus, addr, &n[..words]),
    }
}

fn write_words(bus: &mut dyn FppBus, addr: VirtAddr, words: &[u16]) -> Result<(), BusFault> {
    let mut at = addr;
    for &word in words {
        bus.write_word(at, word)?;
        at = at.step();
    }
    Ok(())
}

/// Fetches an integer source operand, sign-extended to 32 bits.
///
/// Register mode reads a CPU general register (any of r0-r7) as a 16-bit
/// short; immediate mode is always a 16-bit short; otherwise `long`
/// selects a two-word value, high word first.
pub(crate) fn read_int(bus: &mut dyn FppBus, instr: u16, long: bool) -> Result<i32, BusFault> {
    let reg = (instr & 7) as usize;
    if instr & 0o70 == 0 {
        return Ok(bus.reg(reg) as i16 as i32);
    }
    let wide = long && !is_immediate(instr);
    let bytes = if wide { 4 } else { 2 };
    let addr = bus.virtual_for_mode(instr & 0o77, AccessType::Read, bytes)?;
    if wide {
        let high = bus.read_word(addr)?;
        let low = bus.read_word(addr.step())?;
        Ok((((high as u32) << 16) | low as u32) as i32)
    } else {
        Ok(bus.read_word(addr)? as i16 as i32)
    }
}

/// Resolves an integer destination without writing it yet.
///
/// The destination width is a property of the resolved place: register and
/// immediate destinations are 16-bit regardless of `long`.
pub(crate) fn resolve_int(
    bus: &mut dyn FppBus,
    instr: u16,
    long: bool,
) -> Result<IntPlace, BusFault> {
    let reg = (instr & 7) as usize;
    if instr & 0o70 == 0 {
        return Ok(IntPlace::Reg(reg));
    }
    let words = if long && !is_immediate(instr) { 2 } else { 1 };
    let addr = bus.virtual_for_mode(instr & 0o77, AccessType::Write, words * 2)?;
    Ok(IntPlace::Mem {
        addr,
        words: words as usize,
    })
}

/// Returns `true` when the resolved destination takes a 32-bit value.
pub(crate) fn int_place_is_wide(place: &IntPlace) -> bool {
    matches!(place, IntPlace::Mem { words: 2, .. })
}

/// Writes an integer to a resolved destination; two-word destinations get
/// the high word first.
pub(crate) fn write_int(
    bus: &mut dyn FppBus,
    place: &IntPlace,
    value: i32,
) -> Result<(), BusFault> {
    match *place {
        IntPlace::Reg(reg) => {
            bus.set_reg(reg, value as u16);
            Ok(())
        }
        IntPlace::Mem { addr, words: 2 } => {
            bus.write_word(addr, (value as u32 >> 16) as u16)?;
            bus.write_word(addr.step(), value as u16)
        }
        IntPlace::Mem { addr, .. } => bus.write_word(addr, value as u16),
    }
}
