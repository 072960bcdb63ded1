//! Host CPU Harness.
//!
//! The slice of a PDP-11 processor the FP11 core needs to see: eight
//! general registers, the four condition-code flags, the pending-trap
//! mask, and the addressing-mode resolver. Modes 1-7 behave as in the
//! integer processor except that auto-increment and auto-decrement step by
//! the floating operand length, with the historical quirk that `(PC)+`
//! always steps by 2 to form short literals.

use crate::common::{AccessType, BusFault, VirtAddr};
use crate::core::bus::FppBus;
use crate::system::memory::Memory;

/// Trap-mask bit the FPP raises for a pending floating-point trap.
pub const TRAP_MASK_FPP: u16 = 0x0008;

/// Minimal host processor implementing the FPP bus contract.
pub struct Cpu {
    /// General registers r0-r7; r7 is the PC.
    pub regs: [u16; 8],
    /// Condition-code flags (N, Z, V, C in the low four bits).
    pub flags: u16,
    /// Pending-trap mask; the FPP owns bit 3.
    pub trap_mask: u16,
    /// System memory.
    pub memory: Memory,
}

impl Cpu {
    /// Creates a processor around the given memory, registers clear.
    pub fn new(memory: Memory) -> Self {
        Self {
            regs: [0; 8],
            flags: 0,
            trap_mask: 0,
            memory,
        }
    }

    /// Current PC.
    pub fn pc(&self) -> u16 {
        self.regs[7]
    }

    /// Sets the PC.
    pub fn set_pc(&mut self, pc: u16) {
        self.regs[7] = pc;
    }

    /// Fetches the instruction word at the PC and advances past it.
    pub fn fetch(&mut self) -> Result<u16, BusFault> {
        let word = self.memory.read_word(VirtAddr::i_space(self.regs[7]))?;
        self.regs[7] = self.regs[7].wrapping_add(2);
        Ok(word)
    }

    /// Consumes a pending floating-point trap, returning whether one was
    /// pending. The real processor would vector through 244 here.
    pub fn take_fpp_trap(&mut self) -> bool {
        let pending = self.trap_mask & TRAP_MASK_FPP != 0;
        self.trap_mask &= !TRAP_MASK_FPP;
        pending
    }

    fn operand_space(reg: usize, offset: u16) -> VirtAddr {
        // Operands addressed through the PC come from instruction space.
        if reg == 7 {
            VirtAddr::i_space(offset)
        } else {
            VirtAddr::d_space(offset)
        }
    }
}

impl FppBus for Cpu {
    fn virtual_for_mode(
        &mut self,
        spec: u16,
        _access: AccessType,
        bytes: u16,
    ) -> Result<VirtAddr, BusFault> {
        let reg = (spec & 7) as usize;
        match (spec >> 3) & 7 {
            // Register mode never reaches the bus; resolve it like
            // register-deferred so a stray call still lands somewhere sane.
            0 | 1 => Ok(VirtAddr::d_space(self.regs[reg])),
            2 => {
                let step = if reg == 7 { 2 } else { bytes };
                let base = self.regs[reg];
                self.regs[reg] = base.wrapping_add(step);
                Ok(Self::operand_space(reg, base))
            }
            3 => {
                let base = self.regs[reg];
                self.regs[reg] = base.wrapping_add(2);
                let pointer = self.memory.read_word(Self::operand_space(reg, base))?;
                Ok(VirtAddr::d_space(pointer))
            }
            4 => {
                self.regs[reg] = self.regs[reg].wrapping_sub(bytes);
                Ok(VirtAddr::d_space(self.regs[reg]))
            }
            5 => {
                self.regs[reg] = self.regs[reg].wrapping_sub(2);
                let pointer = self.memory.read_word(VirtAddr::d_space(self.regs[reg]))?;
                Ok(VirtAddr::d_space(pointer))
            }
            6 => {
                let index = self.memory.read_word(VirtAddr::i_space(self.regs[7]))?;
                self.regs[7] = self.regs[7].wrapping_add(2);
                Ok(VirtAddr::d_space(self.regs[reg].wrapping_add(index)))
            }
            _ => {
                let index = self.memory.read_word(VirtAddr::i_space(self.regs[7]))?;
                self.regs[7] = self.regs[7].wrapping_add(2);
                let base = self.regs[reg].wrapping_add(index);
                let pointer = self.memory.read_word(VirtAddr::d_space(base))?;
                Ok(VirtAddr::d_space(pointer))
            }
        }
    }

    fn read_word(&mut self, addr: VirtAddr) -> Result<u16, BusFault> {
        self.memory.read_word(addr)
    }

    fn write_word(&mut self, addr: VirtAddr, value: u16) -> Result<(), BusFault> {
        self.memory.write_word(addr, value)
    }

    fn reg(&self, index: usize) -> u16 {
        self.regs[index]
    }

    fn set_reg(&mut self, index: usize, value: u16) {
        self.regs[index] = value;
    }

    fn set_flags(&mut self, mask: u16, value: u16) {
        self.flags = (self.flags & !mask) | (value & mask);
    }

    fn raise_fpp_trap(&mut self) {
        self.trap_mask |= TRAP_MASK_FPP;
    }
}
