//! Floating-Point Arithmetic Kernels.
//!
//! Add/subtract, multiply, divide, and modulo-fraction over the word-array
//! fraction representation, together with the pack step every kernel
//! finishes with. All kernels operate at the active precision (two or four
//! fraction words) and never touch host floating types.

use std::cmp::Ordering;

use crate::core::bus::FppBus;
use crate::core::fpp::Fpp;
use crate::core::status;
use crate::core::units::frac;

/// Reassembles sign, exponent, and fraction into word 0 and sets the
/// condition codes.
///
/// An exponent at or below zero underflows: with FIU set the trap is taken
/// and the wrapped partial result is kept, otherwise the value becomes
/// clean zero. An exponent at or above 256 overflows analogously under FIV
/// and sets the V condition either way. The undefined-variable encoding can
/// therefore only emerge from a pack whose trap was enabled.
pub(crate) fn pack(fpp: &mut Fpp, bus: &mut dyn FppBus, n: &mut [u16], exponent: i32, sign: u16) {
    let mut cc = 0;
    if exponent <= 0 {
        if fpp.fps & status::FIU != 0 {
            fpp.trap(bus, status::FEC_UNDERFLOW);
            n[0] = sign | (((exponent & 0xff) as u16) << 7) | (n[0] & frac::FRACTION_MASK);
            if sign != 0 {
                cc |= status::FN;
            }
            if exponent & 0xff == 0 {
                cc |= status::FZ;
            }
        } else {
            frac::zero(n);
            cc |= status::FZ;
        }
    } else if exponent >= 256 {
        cc |= status::FV;
        if fpp.fps & status::FIV != 0 {
            fpp.trap(bus, status::FEC_OVERFLOW);
            n[0] = sign | (((exponent & 0xff) as u16) << 7) | (n[0] & frac::FRACTION_MASK);
            if sign != 0 {
                cc |= status::FN;
            }
            if exponent & 0xff == 0 {
                cc |= status::FZ;
            }
        } else {
            frac::zero(n);
            cc |= status::FZ;
        }
    } else {
        n[0] = sign | ((exponent as u16) << 7) | (n[0] & frac::FRACTION_MASK);
        if sign != 0 {
            cc |= status::FN;
        }
    }
    fpp.set_cc(cc);
}

/// Floating add: `AC <- AC + operand`, or subtract when `negate` is set.
///
/// Subtraction is addition with the operand sign inverted. Operands are
/// aligned by right-shifting the smaller-exponent one, saving the last bit
/// out as the guard. Equal-magnitude opposite signs cancel to clean zero.
pub fn add(fpp: &mut Fpp, bus: &mut dyn FppBus, a: usize, negate: bool) {
    let p = fpp.precision();
    let mut n = fpp.ac[a];
    let mut m = fpp.scratch;
    if negate {
        m[0] ^= frac::SIGN_BIT;
    }

    // A zero exponent is an exact zero regardless of fraction.
    let n_exp = frac::exponent_of(&n);
    let m_exp = frac::exponent_of(&m);
    if n_exp == 0 && m_exp == 0 {
        frac::zero(&mut n[..p]);
        fpp.ac[a] = n;
        fpp.set_cc(status::FZ);
        return;
    }
    if m_exp == 0 {
        fpp.set_cc_from(&n);
        return;
    }
    if n_exp == 0 {
        n[..p].copy_from_slice(&m[..p]);
        fpp.ac[a] = n;
        fpp.set_cc_from(&n);
        return;
    }

    let truncate = fpp.fps & status::FT != 0;
    let (n_sign, n_exp) = frac::expose(&mut n[..p]);
    let (m_sign, m_exp) = frac::expose(&mut m[..p]);

    // Align to the larger exponent; the bit shifted out last is the guard.
    let mut exponent;
    let mut guard;
    if n_exp >= m_exp {
        guard = frac::shift_right(&mut m[..p], (n_exp - m_exp) as u32);
        exponent = n_exp;
    } else {
        guard = frac::shift_right(&mut n[..p], (m_exp - n_exp) as u32);
        exponent = m_exp;
    }
    if truncate {
        guard = 0;
    }

    if n_sign == m_sign {
        frac::add_words(&mut n[..p], &m[..p], guard);
        if n[0] & 0x100 != 0 {
            // The sum outgrew the fraction field by one bit.
            if !truncate && n[p - 1] & 1 != 0 {
                frac::add_small(&mut n[..p], 1);
            }
            frac::shift_right(&mut n[..p], 1);
            exponent += 1;
            if n[0] & 0x100 != 0 {
                // Rounding carried all the way out.
                frac::shift_right(&mut n[..p], 1);
                exponent += 1;
            }
        }
        pack(fpp, bus, &mut n[..p], exponent, n_sign);
    } else {
        // Signs differ: subtract the smaller fraction from the larger.
        // A non-zero guard implies the shifted operand is strictly the
        // smaller one, so it only ever enters as a borrow.
        let sign;
        match frac::compare(&n[..p], &m[..p]) {
            Ordering::Equal => {
                frac::zero(&mut n[..p]);
                fpp.ac[a] = n;
                fpp.set_cc(status::FZ);
                return;
            }
            Ordering::Less => {
                frac::sub_words(&mut m[..p], &n[..p], guard);
                n[..p].copy_from_slice(&m[..p]);
                sign = m_sign;
            }
            Ordering::Greater => {
                frac::sub_words(&mut n[..p], &m[..p], guard);
                sign = n_sign;
            }
        }
        if n[0] & frac::HIDDEN_BIT == 0 {
            match frac::first_set_bit(&n[..p], 9) {
                Some(pos) => {
                    frac::shift_left(&mut n[..p], pos - 8);
                    exponent -= (pos - 8) as i32;
                }
                None => exponent = 0,
            }
        }
        pack(fpp, bus, &mut n[..p], exponent, sign);
    }
    fpp.ac[a] = n;
}

/// Schoolbook multiply over base-2^16 digits.
///
/// The top fraction word holds at most eight bits, so the product is
/// accumulated one word high: partial `a[i] * b[j]` lands with its low half
/// at `r[i + j]`. The double-wide result then carries the product scaled so
/// that a normalized-high product sets bit 15 of word 0.
fn mul_fractions(r: &mut [u16], a: &[u16], b: &[u16]) {
    frac::zero(r);
    let p = a.len();
    for i in (0..p).rev() {
        let mut carry: u32 = 0;
        for j in (0..p).rev() {
            let t = a[i] as u32 * b[j] as u32 + r[i + j] as u32 + carry;
            r[i + j] = t as u16;
            carry = t >> 16;
        }
        let mut k = i;
        while carry != 0 && k > 0 {
            k -= 1;
            let t = r[k] as u32 + carry;
            r[k] = t as u16;
            carry = t >> 16;
        }
    }
}

/// Rounds the double-wide product in place when not truncating.
///
/// A normalized-high product (bit 15 of word 0 set) will be shifted right
/// by eight, so its first discarded bit is bit 7 of word `p` - 1; otherwise
/// the shift is seven and the discard bit is bit 6.
fn round_product(r: &mut [u16], p: usize) {
    if r[0] & 0x8000 != 0 {
        if r[p - 1] & 0x80 != 0 {
            frac::add_at(r, p - 1, 0x100);
        }
    } else if r[p - 1] & 0x40 != 0 {
        frac::add_at(r, p - 1, 0x80);
    }
}

/// Floating multiply: `AC <- AC * operand`.
pub fn multiply(fpp: &mut Fpp, bus: &mut dyn FppBus, a: usize) {
    let p = fpp.precision();
    let mut n = fpp.ac[a];
    let mut m = fpp.scratch;
    if frac::exponent_of(&n) == 0 || frac::exponent_of(&m) == 0 {
        frac::zero(&mut n[..p]);
        fpp.ac[a] = n;
        fpp.set_cc(status::FZ);
        return;
    }
    let (n_sign, n_exp) = frac::expose(&mut n[..p]);
    let (m_sign, m_exp) = frac::expose(&mut m[..p]);
    let sign = n_sign ^ m_sign;
    let mut exponent = n_exp + m_exp - status::EXP_BIAS;

    let mut buf = [0u16; 8];
    let r = &mut buf[..2 * p];
    mul_fractions(r, &n[..p], &m[..p]);
    if fpp.fps & status::FT == 0 {
        round_product(r, p);
    }
    if r[0] & 0x8000 != 0 {
        frac::shift_right(r, 8);
    } else {
        frac::shift_right(r, 7);
        exponent -= 1;
    }
    n[..p].copy_from_slice(&r[..p]);
    pack(fpp, bus, &mut n[..p], exponent, sign);
    fpp.ac[a] = n;
}

/// Floating divide: `AC <- AC / operand`.
///
/// Long division over base-2^16 digits. Each quotient digit is estimated
/// from the leading 48 bits of the remainder against the leading 32 bits of
/// the divisor; the estimate is at most one too large, and the overdraw is
/// detected by the leading remainder word failing to clear, in which case
/// the divisor is added back once.
pub fn divide(fpp: &mut Fpp, bus: &mut dyn FppBus, a: usize) {
    let p = fpp.precision();
    let mut n = fpp.ac[a];
    let mut m = fpp.scratch;
    if frac::exponent_of(&m) == 0 {
        fpp.trap(bus, status::FEC_DIVIDE_BY_ZERO);
        return;
    }
    if frac::exponent_of(&n) == 0 {
        frac::zero(&mut n[..p]);
        fpp.ac[a] = n;
        fpp.set_cc(status::FZ);
        return;
    }
    let (n_sign, n_exp) = frac::expose(&mut n[..p]);
    let (m_sign, m_exp) = frac::expose(&mut m[..p]);
    let sign = n_sign ^ m_sign;
    let mut exponent = n_exp - m_exp + status::EXP_BIAS;

    // Scale the numerator so it strictly exceeds the denominator at the
    // first step and the leading quotient digit lands in 0x80..0xff.
    let mut buf = [0u16; 8];
    let r = &mut buf[..2 * p];
    r[..p].copy_from_slice(&n[..p]);
    if frac::compare(&n[..p], &m[..p]) == Ordering::Less {
        frac::shift_left(r, 8);
    } else {
        frac::shift_left(r, 7);
        exponent += 1;
    }

    let divisor = ((m[0] as u32) << 16) | m[1] as u32;
    for o in 0..p {
        let mut qhat = estimate_digit(r, o, divisor);
        // Multiply-subtract qhat * divisor from the remainder at offset o.
        let mut borrow: u32 = 0;
        for j in (0..p).rev() {
            let t = qhat * m[j] as u32 + borrow;
            borrow = t >> 16;
            let (word, under) = r[o + j].overflowing_sub(t as u16);
            r[o + j] = word;
            if under {
                borrow += 1;
            }
        }
        let overdrawn = if o == 0 {
            borrow != 0
        } else {
            r[o - 1] = r[o - 1].wrapping_sub(borrow as u16);
            r[o - 1] != 0
        };
        if overdrawn {
            // The estimate was one too large: undo a single divisor.
            qhat -= 1;
            let carry = frac::add_words(&mut r[o..o + p], &m[..p], 0);
            if o > 0 {
                r[o - 1] = r[o - 1].wrapping_add(carry);
            }
        }
        n[o] = qhat as u16;
    }

    if fpp.fps & status::FT == 0 {
        // One lookahead digit decides the rounding of the last stored bit.
        let next = estimate_digit(r, p, divisor);
        if next & 0x8000 != 0 {
            frac::add_small(&mut n[..p], 1);
            if n[0] & 0x100 != 0 {
                frac::shift_right(&mut n[..p], 1);
                exponent += 1;
            }
        }
    }
    pack(fpp, bus, &mut n[..p], exponent, sign);
    fpp.ac[a] = n;
}

/// Estimates quotient digit `o` from the remainder's leading words.
///
/// The first digit uses a 32-bit numerator because no word precedes the
/// remainder; later digits use 48 bits. Clamped to the digit range.
fn estimate_digit(r: &[u16], o: usize, divisor: u32) -> u32 {
    let num: u64 = if o == 0 {
        ((r[0] as u64) << 16) | r[1] as u64
    } else {
        ((r[o - 1] as u64) << 32) | ((r[o] as u64) << 16) | r[o + 1] as u64
    };
    (num / divisor as u64).min(0xffff) as u32
}

/// Floating modulo: multiply, then split the product into integer and
/// fraction parts.
///
/// The integer part goes to AC|1 and the fraction to AC, so an odd
/// accumulator keeps only the fraction. Rounding is applied only while the
/// integer part occupies fewer than eight bits; beyond that the hardware
/// had no guard bits left and neither do we.
pub fn modulo(fpp: &mut Fpp, bus: &mut dyn FppBus, a: usize) {
    let p = fpp.precision();
    let whole_ac = a | 1;
    let mut n = fpp.ac[a];
    let mut m = fpp.scratch;
    if frac::exponent_of(&n) == 0 || frac::exponent_of(&m) == 0 {
        frac::zero(&mut fpp.ac[whole_ac][..p]);
        frac::zero(&mut n[..p]);
        fpp.ac[a] = n;
        fpp.set_cc(status::FZ);
        return;
    }
    let (n_sign, n_exp) = frac::expose(&mut n[..p]);
    let (m_sign, m_exp) = frac::expose(&mut m[..p]);
    let sign = n_sign ^ m_sign;
    let mut exponent = n_exp + m_exp - status::EXP_BIAS;

    let mut buf = [0u16; 8];
    let r = &mut buf[..2 * p];
    mul_fractions(r, &n[..p], &m[..p]);
    if fpp.fps & status::FT == 0 && exponent < status::EXP_BIAS + 8 {
        round_product(r, p);
    }
    if r[0] & 0x8000 != 0 {
        frac::shift_right(r, 8);
    } else {
        frac::shift_right(r, 7);
        exponent -= 1;
    }

    // Number of integer bits in the product.
    let int_bits = exponent - status::EXP_BIAS;
    if int_bits <= 0 {
        frac::zero(&mut fpp.ac[whole_ac][..p]);
        n[..p].copy_from_slice(&r[..p]);
        pack(fpp, bus, &mut n[..p], exponent, sign);
        fpp.ac[a] = n;
        return;
    }

    // The integer occupies positions 8 .. split-1 of the product field.
    let split = 8 + int_bits as u32;
    let mut whole = [0u16; 4];
    for i in 0..p {
        let low = i as u32 * 16;
        whole[i] = if split <= low {
            0
        } else if split >= low + 16 {
            r[i]
        } else {
            r[i] & (0xffff << (16 - (split - low)))
        };
    }
    pack(fpp, bus, &mut whole[..p], exponent, sign);
    fpp.ac[whole_ac] = whole;

    // Strip the integer bits and renormalize what remains.
    for i in 0..2 * p {
        let low = i as u32 * 16;
        if split >= low + 16 {
            r[i] = 0;
        } else if split > low {
            r[i] &= 0xffff >> (split - low);
        }
    }
    match frac::first_set_bit(r, split) {
        Some(pos) => {
            frac::shift_left(r, pos - 8);
            n[..p].copy_from_slice(&r[..p]);
            pack(fpp, bus, &mut n[..p], exponent - (pos - 8) as i32, sign);
        }
        None => {
            frac::zero(&mut n[..p]);
            fpp.set_cc(status::FZ);
        }
    }
    fpp.ac[a] = n;
}

/// Floating compare: condition codes from `operand - AC`.
pub fn compare(fpp: &mut Fpp, a: usize) {
    let p = fpp.precision();
    let n = fpp.ac[a];
    let m = fpp.scratch;
    let n_exp = frac::exponent_of(&n);
    let m_exp = frac::exponent_of(&m);
    let n_sign = frac::sign_of(&n);
    let m_sign = frac::sign_of(&m);

    let cc = if m_exp == 0 && n_exp == 0 {
        status::FZ
    } else if m_exp == 0 {
        // Zero minus a non-zero: negative exactly when AC is positive.
        if n_sign == 0 {
            status::FN
        } else {
            0
        }
    } else if n_exp == 0 {
        if m_sign != 0 {
            status::FN
        } else {
            0
        }
    } else if m_sign != n_sign {
        if m_sign != 0 {
            status::FN
        } else {
            0
        }
    } else {
        // Same sign: word 0 with the sign stripped orders exponent and
        // leading fraction together, so a word compare decides.
        let mut mv = m;
        let mut nv = n;
        mv[0] &= !frac::SIGN_BIT;
        nv[0] &= !frac::SIGN_BIT;
        match frac::compare(&mv[..p], &nv[..p]) {
            Ordering::Equal => status::FZ,
            Ordering::Less => {
                if m_sign == 0 {
                    status::FN
                } else {
                    0
                }
            }
            Ordering::Greater => {
                if m_sign == 0 {
                    0
                } else {
                    status::FN
                }
            }
        }
    };
    fpp.set_cc(cc);
}

/// Adds one unit in the last place to a packed value and re-packs.
///
/// Used by the precision-narrowing conversions to round the truncated
/// fraction upward.
pub(crate) fn increment(fpp: &mut Fpp, bus: &mut dyn FppBus, n: &mut [u16]) {
    let (sign, mut exponent) = frac::expose(n);
    frac::add_small(n, 1);
    if n[0] & 0x100 != 0 {
        frac::shift_right(n, 1);
        exponent += 1;
    }
    pack(fpp, bus, n, exponent, sign);
}

/// Load exponent: replaces the accumulator exponent with a signed argument
/// plus the bias, keeping sign and fraction.
pub fn load_exponent(fpp: &mut Fpp, bus: &mut dyn FppBus, a: usize, word: u16) {
    let p = fpp.precision();
    let mut n = fpp.ac[a];
    let (sign, _) = frac::expose(&mut n[..p]);
    let exponent = word as i16 as i32 + status::EXP_BIAS;
    pack(fpp, bus, &mut n[..p], exponent, sign);
    fpp.ac[a] = n;
}
