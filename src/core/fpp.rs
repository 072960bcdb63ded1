//! FP11 Processor State and Instruction Dispatch.
//!
//! The FPP is a synchronous state machine invoked once per floating-point
//! opcode. It owns six accumulators, the status register FPS, and the error
//! registers FEC/FEA. Architectural traps update the error registers and
//! raise the CPU trap mask; host memory faults instead unwind the
//! instruction through `Result` with FPS untouched.

use crate::common::{AccessType, BusFault};
use crate::core::bus::FppBus;
use crate::core::operand;
use crate::core::status;
use crate::core::units::{arith, convert, frac};

/// The FP11 floating-point processor.
///
/// All state is owned here; the host is reached only through the
/// [`FppBus`](crate::core::bus::FppBus) handed to [`execute`](Fpp::execute).
pub struct Fpp {
    /// Floating-point status register.
    pub fps: u16,
    /// Floating error code of the most recent trap.
    pub fec: u16,
    /// Virtual PC of the most recent failing instruction.
    pub fea: u16,
    /// Accumulators AC0-AC5.
    pub ac: [[u16; 4]; 6],
    /// Operand buffer filled by the addressing layer.
    pub(crate) scratch: [u16; 4],
    backup_pc: u16,
}

impl Fpp {
    /// Creates a processor in the power-up state: FPS clear (single
    /// precision, short integers, rounding), all accumulators zero.
    pub fn new() -> Self {
        Self {
            fps: 0,
            fec: 0,
            fea: 0,
            ac: [[0; 4]; 6],
            scratch: [0; 4],
            backup_pc: 0,
        }
    }

    /// Active precision in fraction words: 4 in double mode, else 2.
    pub fn precision(&self) -> usize {
        if self.fps & status::FD != 0 {
            4
        } else {
            2
        }
    }

    /// Loads FPS, masking the reserved bits.
    pub fn write_fps(&mut self, value: u16) {
        self.fps = value & status::FPS_WRITE_MASK;
    }

    pub(crate) fn set_cc(&mut self, cc: u16) {
        self.fps = (self.fps & !status::CC_MASK) | cc;
    }

    /// Condition codes from a packed value: N from the sign, Z from a zero
    /// exponent.
    pub(crate) fn set_cc_from(&mut self, n: &[u16]) {
        let mut cc = 0;
        if frac::sign_of(n) != 0 {
            cc |= status::FN;
        }
        if frac::exponent_of(n) == 0 {
            cc |= status::FZ;
        }
        self.set_cc(cc);
    }

    /// Takes an architectural floating-point trap.
    ///
    /// Latches FER, the error code, and the failing PC. The CPU is
    /// signalled unless interrupts are disabled; the in-progress result is
    /// still committed by the caller.
    pub(crate) fn trap(&mut self, bus: &mut dyn FppBus, code: u16) {
        self.fps |= status::FER;
        self.fec = code;
        self.fea = self.backup_pc.wrapping_sub(2);
        if self.fps & status::FID == 0 {
            bus.raise_fpp_trap();
        }
    }

    /// Executes one floating-point instruction.
    ///
    /// The caller has already recognized bits 15..12 as the FPP opcode
    /// family and advanced the PC past the instruction word. A returned
    /// fault means the host memory system failed mid-instruction; FPS and
    /// the destination are left as they were.
    pub fn execute(&mut self, instr: u16, bus: &mut dyn FppBus) -> Result<(), BusFault> {
        self.backup_pc = bus.reg(7);
        let a = ((instr >> 6) & 3) as usize;
        match (instr >> 8) & 0x0f {
            0x0 => match (instr >> 6) & 3 {
                0 => self.no_operand(instr, bus),
                1 => {
                    // LDFPS
                    let value = operand::read_int(bus, instr, false)?;
                    self.write_fps(value as u16);
                    Ok(())
                }
                2 => {
                    // STFPS
                    let place = operand::resolve_int(bus, instr, false)?;
                    operand::write_int(bus, &place, self.fps as i32)
                }
                _ => self.store_status(instr, bus),
            },
            0x1 => match (instr >> 6) & 3 {
                0 => self.clear(instr, bus),
                1 => self.test(instr, bus),
                2 => self.abs_neg(instr, bus, false),
                _ => self.abs_neg(instr, bus, true),
            },
            0x2 => self.binary(instr, bus, a, BinaryOp::Mul),
            0x3 => self.binary(instr, bus, a, BinaryOp::Mod),
            0x4 => self.binary(instr, bus, a, BinaryOp::Add),
            0x5 => self.load(instr, bus, a),
            0x6 => self.binary(instr, bus, a, BinaryOp::Sub),
            0x7 => self.binary(instr, bus, a, BinaryOp::Cmp),
            0x8 => {
                // STF
                let n = self.ac[a];
                operand::write_fp(self, bus, instr, &n)?;
                Ok(())
            }
            0x9 => self.binary(instr, bus, a, BinaryOp::Div),
            0xa => self.store_exponent(instr, bus, a),
            0xb => self.store_converted_integer(instr, bus, a),
            0xc => self.store_converted_precision(instr, bus, a),
            0xd => {
                // LDEXP
                let value = operand::read_int(bus, instr, false)?;
                arith::load_exponent(self, bus, a, value as u16);
                Ok(())
            }
            0xe => {
                // LDCIF/LDCID/LDCLF/LDCLD
                let long = self.fps & status::FL != 0;
                let value = operand::read_int(bus, instr, long)?;
                convert::load_integer(self, bus, a, value);
                Ok(())
            }
            _ => self.load_converted_precision(instr, bus, a),
        }
    }

    /// CFCC and the mode-setting group, selected by the low six bits.
    fn no_operand(&mut self, instr: u16, bus: &mut dyn FppBus) -> Result<(), BusFault> {
        match instr & 0o77 {
            0o00 => bus.set_flags(status::CC_MASK, self.fps & status::CC_MASK),
            0o01 => self.fps &= !status::FD,
            0o02 => self.fps &= !status::FL,
            0o11 => self.fps |= status::FD,
            0o12 => self.fps |= status::FL,
            _ => self.trap(bus, status::FEC_ILLEGAL_OP),
        }
        Ok(())
    }

    /// STST: error code and error address to the destination. Register
    /// mode takes only the code.
    fn store_status(&mut self, instr: u16, bus: &mut dyn FppBus) -> Result<(), BusFault> {
        if instr & 0o70 == 0 {
            bus.set_reg((instr & 7) as usize, self.fec);
            return Ok(());
        }
        let immediate = instr & 0o77 == 0o27;
        let bytes = if immediate { 2 } else { 4 };
        let addr = bus.virtual_for_mode(instr & 0o77, AccessType::Write, bytes)?;
        bus.write_word(addr, self.fec)?;
        if !immediate {
            bus.write_word(addr.step(), self.fea)?;
        }
        Ok(())
    }

    fn clear(&mut self, instr: u16, bus: &mut dyn FppBus) -> Result<(), BusFault> {
        if operand::write_fp(self, bus, instr, &[0; 4])? {
            self.set_cc(status::FZ);
        }
        Ok(())
    }

    fn test(&mut self, instr: u16, bus: &mut dyn FppBus) -> Result<(), BusFault> {
        let Some(opnd) = operand::read_fp(self, bus, instr, AccessType::Read)? else {
            return Ok(());
        };
        if self.undefined_trap(bus, &opnd) {
            return Ok(());
        }
        let n = self.scratch;
        self.set_cc_from(&n);
        Ok(())
    }

    /// ABSF/NEGF: read-modify-write through the captured operand location.
    /// The undefined-variable trap fires after the cleanup has run.
    fn abs_neg(&mut self, instr: u16, bus: &mut dyn FppBus, negate: bool) -> Result<(), BusFault> {
        let Some(opnd) = operand::read_fp(self, bus, instr, AccessType::Modify)? else {
            return Ok(());
        };
        let p = self.precision();
        let mut n = self.scratch;
        if frac::exponent_of(&n) == 0 {
            frac::zero(&mut n[..p]);
        } else if negate {
            n[0] ^= frac::SIGN_BIT;
        } else {
            n[0] &= !frac::SIGN_BIT;
        }
        operand::write_back(self, bus, &opnd.place, &n)?;
        self.set_cc_from(&n);
        if opnd.undefined && self.fps & status::FIUV != 0 {
            self.trap(bus, status::FEC_UNDEFINED_VARIABLE);
        }
        Ok(())
    }

    fn load(&mut self, instr: u16, bus: &mut dyn FppBus, a: usize) -> Result<(), BusFault> {
        let Some(opnd) = operand::read_fp(self, bus, instr, AccessType::Read)? else {
            return Ok(());
        };
        if self.undefined_trap(bus, &opnd) {
            return Ok(());
        }
        let p = self.precision();
        let n = self.scratch;
        self.ac[a][..p].copy_from_slice(&n[..p]);
        self.set_cc_from(&n);
        Ok(())
    }

    fn binary(
        &mut self,
        instr: u16,
        bus: &mut dyn FppBus,
        a: usize,
        op: BinaryOp,
    ) -> Result<(), BusFault> {
        let Some(opnd) = operand::read_fp(self, bus, instr, AccessType::Read)? else {
            return Ok(());
        };
        if self.undefined_trap(bus, &opnd) {
            return Ok(());
        }
        match op {
            BinaryOp::Add => arith::add(self, bus, a, false),
            BinaryOp::Sub => arith::add(self, bus, a, true),
            BinaryOp::Mul => arith::multiply(self, bus, a),
            BinaryOp::Div => arith::divide(self, bus, a),
            BinaryOp::Mod => arith::modulo(self, bus, a),
            BinaryOp::Cmp => arith::compare(self, a),
        }
        Ok(())
    }

    /// STEXP: unbiased exponent to an integer destination, condition codes
    /// mirrored into the CPU.
    fn store_exponent(&mut self, instr: u16, bus: &mut dyn FppBus, a: usize) -> Result<(), BusFault> {
        let place = operand::resolve_int(bus, instr, false)?;
        let value = frac::exponent_of(&self.ac[a]) - status::EXP_BIAS;
        operand::write_int(bus, &place, value)?;
        let cc = if value < 0 {
            status::FN
        } else if value == 0 {
            status::FZ
        } else {
            0
        };
        self.set_cc(cc);
        bus.set_flags(status::CC_MASK, self.fps & status::CC_MASK);
        Ok(())
    }

    /// STCFI/STCFL/STCDI/STCDL: floating to integer.
    fn store_converted_integer(
        &mut self,
        instr: u16,
        bus: &mut dyn FppBus,
        a: usize,
    ) -> Result<(), BusFault> {
        let long = self.fps & status::FL != 0;
        let place = operand::resolve_int(bus, instr, long)?;
        let wide = operand::int_place_is_wide(&place);
        let (value, cc, overflow) = convert::store_integer(self, a, wide);
        operand::write_int(bus, &place, value)?;
        self.set_cc(cc);
        if overflow && self.fps & status::FIC != 0 {
            self.trap(bus, status::FEC_INTEGER_OVERFLOW);
        }
        bus.set_flags(status::CC_MASK, self.fps & status::CC_MASK);
        Ok(())
    }

    /// STCFD/STCDF: store the accumulator at the opposite precision.
    fn store_converted_precision(
        &mut self,
        instr: u16,
        bus: &mut dyn FppBus,
        a: usize,
    ) -> Result<(), BusFault> {
        let n = convert::store_precision(self, bus, a);
        self.fps ^= status::FD;
        let result = operand::write_fp(self, bus, instr, &n);
        self.fps ^= status::FD;
        result.map(|_| ())
    }

    /// LDCDF/LDCFD: load an operand of the opposite precision.
    fn load_converted_precision(
        &mut self,
        instr: u16,
        bus: &mut dyn FppBus,
        a: usize,
    ) -> Result<(), BusFault> {
        self.fps ^= status::FD;
        let fetched = operand::read_fp(self, bus, instr, AccessType::Read);
        self.fps ^= status::FD;
        let Some(opnd) = fetched? else {
            return Ok(());
        };
        if self.undefined_trap(bus, &opnd) {
            return Ok(());
        }
        convert::load_precision(self, bus, a);
        Ok(())
    }

    /// Raises the undefined-variable trap for operands that fire before
    /// execution. Returns `true` when the instruction must be abandoned.
    fn undefined_trap(&mut self, bus: &mut dyn FppBus, opnd: &operand::FpOperand) -> bool {
        if opnd.undefined && self.fps & status::FIUV != 0 {
            self.trap(bus, status::FEC_UNDEFINED_VARIABLE);
            return true;
        }
        false
    }
}

impl Default for Fpp {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-operand kernel selector for the shared fetch path.
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Cmp,
}
