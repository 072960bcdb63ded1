//! FPS Register Bits and Error Codes.
//!
//! Bit assignments of the floating-point status register (FPS) and the
//! error-kind codes latched into FEC when a floating-point trap is taken.

/// Floating error: set whenever a floating-point trap condition occurs.
pub const FER: u16 = 0x8000;
/// Interrupt disable: suppresses the CPU trap signal for all error kinds.
pub const FID: u16 = 0x4000;
/// Trap on reading the undefined-variable encoding from memory.
pub const FIUV: u16 = 0x0800;
/// Trap on floating underflow.
pub const FIU: u16 = 0x0400;
/// Trap on floating overflow.
pub const FIV: u16 = 0x0200;
/// Trap on integer-conversion failure.
pub const FIC: u16 = 0x0100;
/// Double-precision mode (four fraction words instead of two).
pub const FD: u16 = 0x0080;
/// Long-integer mode for the integer conversions (32-bit instead of 16).
pub const FL: u16 = 0x0040;
/// Truncate instead of rounding to nearest.
pub const FT: u16 = 0x0020;

/// Condition code: negative.
pub const FN: u16 = 0x0008;
/// Condition code: zero.
pub const FZ: u16 = 0x0004;
/// Condition code: overflow.
pub const FV: u16 = 0x0002;
/// Condition code: carry.
pub const FC: u16 = 0x0001;

/// Mask selecting the four condition-code bits.
pub const CC_MASK: u16 = 0x000f;

/// Writable FPS bits: bits 13, 12, and 4 are reserved and read as zero.
pub const FPS_WRITE_MASK: u16 = 0xcfef;

/// Excess-128 exponent bias of the floating format.
pub const EXP_BIAS: i32 = 128;

/// FEC: illegal floating opcode or illegal register-mode accumulator.
pub const FEC_ILLEGAL_OP: u16 = 2;
/// FEC: divisor with zero exponent.
pub const FEC_DIVIDE_BY_ZERO: u16 = 4;
/// FEC: float-to-integer conversion out of range.
pub const FEC_INTEGER_OVERFLOW: u16 = 6;
/// FEC: packed exponent at or above 256.
pub const FEC_OVERFLOW: u16 = 8;
/// FEC: packed exponent at or below 0 for a non-zero result.
pub const FEC_UNDERFLOW: u16 = 10;
/// FEC: undefined-variable encoding read from memory.
pub const FEC_UNDEFINED_VARIABLE: u16 = 12;
/// FEC: maintenance-mode trap, raised by diagnostics only.
pub const FEC_MAINTENANCE: u16 = 14;
