//! Property-based tests for the FP11 core.
//!
//! These verify the quantified invariants of the arithmetic: primitives
//! against wide-integer models, the canonical-zero and never-undefined
//! guarantees, the condition-code law, conversion round-trips, and the
//! divide-multiply error bound.

use proptest::prelude::*;

use fp11_emulator::common::VirtAddr;
use fp11_emulator::core::units::frac;
use fp11_emulator::core::{status, Fpp};
use fp11_emulator::system::{Cpu, Memory};

fn setup(fps: u16) -> (Fpp, Cpu) {
    let mut fpp = Fpp::new();
    fpp.write_fps(fps);
    (fpp, Cpu::new(Memory::new(32768)))
}

fn op(family: u16, ac: u16, spec: u16) -> u16 {
    0o170000 | (family << 8) | (ac << 6) | spec
}

fn to_u64(n: &[u16; 4]) -> u64 {
    ((n[0] as u64) << 48) | ((n[1] as u64) << 32) | ((n[2] as u64) << 16) | n[3] as u64
}

fn from_u64(v: u64) -> [u16; 4] {
    [(v >> 48) as u16, (v >> 32) as u16, (v >> 16) as u16, v as u16]
}

/// A normalized floating value: exponent 1..=255, arbitrary fraction.
fn arb_normal() -> impl Strategy<Value = [u16; 4]> {
    (
        any::<bool>(),
        1u16..=255,
        0u16..=0x7f,
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
    )
        .prop_map(|(sign, exp, f0, f1, f2, f3)| {
            let sign_bit = if sign { 0x8000 } else { 0 };
            [sign_bit | (exp << 7) | f0, f1, f2, f3]
        })
}

/// Decodes sign, biased exponent, and the 57-bit fraction with hidden bit.
fn decode(n: &[u16; 4]) -> (bool, i32, u64) {
    let sign = n[0] & 0x8000 != 0;
    let exp = ((n[0] >> 7) & 0xff) as i32;
    let mag = (((n[0] & 0x7f) as u64 | 0x80) << 48)
        | ((n[1] as u64) << 32)
        | ((n[2] as u64) << 16)
        | n[3] as u64;
    (sign, exp, mag)
}

proptest! {
    /// Property: shift_right matches a 64-bit model and returns the last
    /// bit shifted out as the guard.
    #[test]
    fn prop_shift_right_model(v in any::<u64>(), by in 0u32..=70) {
        let mut n = from_u64(v);
        let guard = frac::shift_right(&mut n, by);
        let expected = if by >= 64 { 0 } else { v >> by };
        prop_assert_eq!(to_u64(&n), expected);
        let expected_guard = if by >= 1 && by <= 64 {
            ((v >> (by - 1)) & 1) as u16
        } else {
            0
        };
        prop_assert_eq!(guard, expected_guard);
    }

    /// Property: shift_left matches a 64-bit model.
    #[test]
    fn prop_shift_left_model(v in any::<u64>(), by in 0u32..=70) {
        let mut n = from_u64(v);
        frac::shift_left(&mut n, by);
        let expected = if by >= 64 { 0 } else { v << by };
        prop_assert_eq!(to_u64(&n), expected);
    }

    /// Property: add_words matches 128-bit addition with carry-in and
    /// carry-out.
    #[test]
    fn prop_add_words_model(a in any::<u64>(), b in any::<u64>(), carry in 0u16..=1) {
        let mut n = from_u64(a);
        let out = frac::add_words(&mut n, &from_u64(b), carry);
        let sum = a as u128 + b as u128 + carry as u128;
        prop_assert_eq!(to_u64(&n), sum as u64);
        prop_assert_eq!(out as u128, sum >> 64);
    }

    /// Property: sub_words matches wrapping subtraction with borrow-in.
    #[test]
    fn prop_sub_words_model(a in any::<u64>(), b in any::<u64>(), borrow in 0u16..=1) {
        let mut n = from_u64(a);
        frac::sub_words(&mut n, &from_u64(b), borrow);
        prop_assert_eq!(to_u64(&n), a.wrapping_sub(b).wrapping_sub(borrow as u64));
    }

    /// Property: with traps disabled, the four arithmetic operations never
    /// produce the undefined-variable encoding, any zero result is
    /// canonical, and the condition codes obey the law
    /// FZ <=> exponent 0, FN <=> sign bit.
    #[test]
    fn prop_arithmetic_invariants(
        n in arb_normal(),
        m in arb_normal(),
        family in prop::sample::select(vec![4u16, 6, 2, 9]),
    ) {
        let (mut fpp, mut cpu) = setup(status::FD);
        fpp.ac[0] = n;
        fpp.ac[1] = m;
        fpp.execute(op(family, 0, 1), &mut cpu).unwrap();
        let r = fpp.ac[0];
        prop_assert!(!frac::is_undefined(&r), "undefined variable from {:?}", r);
        if frac::exponent_of(&r) == 0 {
            prop_assert_eq!(r, [0, 0, 0, 0]);
        }
        let cc = fpp.fps & status::CC_MASK;
        prop_assert_eq!(cc & status::FZ != 0, frac::exponent_of(&r) == 0);
        prop_assert_eq!(cc & status::FN != 0, frac::sign_of(&r) != 0);
        prop_assert_eq!(cpu.trap_mask, 0);
    }

    /// Property: storing and reloading through memory is the identity.
    #[test]
    fn prop_store_load_roundtrip(n in arb_normal()) {
        let (mut fpp, mut cpu) = setup(status::FD);
        fpp.ac[0] = n;
        cpu.regs[1] = 0o2000;
        fpp.execute(op(8, 0, 0o11), &mut cpu).unwrap(); // STF
        fpp.execute(op(5, 1, 0o11), &mut cpu).unwrap(); // LDF into AC1
        prop_assert_eq!(fpp.ac[1], n);
    }

    /// Property: short integer load/store round-trips exactly.
    #[test]
    fn prop_integer_roundtrip_short(v in any::<i16>()) {
        let (mut fpp, mut cpu) = setup(status::FD);
        cpu.regs[0] = v as u16;
        fpp.execute(op(0xe, 0, 0), &mut cpu).unwrap(); // LDCIF
        fpp.execute(op(0xb, 0, 1), &mut cpu).unwrap(); // STCFI to r1
        prop_assert_eq!(cpu.regs[1], v as u16);
        prop_assert_eq!(cpu.trap_mask, 0);
    }

    /// Property: long integer load/store round-trips exactly in double
    /// precision.
    #[test]
    fn prop_integer_roundtrip_long(v in any::<i32>()) {
        let (mut fpp, mut cpu) = setup(status::FD | status::FL);
        cpu.memory.load_at(0o2000, &[(v as u32 >> 16) as u16, v as u16]);
        cpu.regs[1] = 0o2000;
        cpu.regs[2] = 0o3000;
        fpp.execute(op(0xe, 0, 0o11), &mut cpu).unwrap();
        fpp.execute(op(0xb, 0, 0o12), &mut cpu).unwrap();
        let high = cpu.memory.read_word(VirtAddr::d_space(0o3000)).unwrap();
        let low = cpu.memory.read_word(VirtAddr::d_space(0o3002)).unwrap();
        prop_assert_eq!((((high as u32) << 16) | low as u32) as i32, v);
        prop_assert_eq!(cpu.trap_mask, 0);
    }

    /// Property: CMPF orders values the way the decoded magnitudes do.
    #[test]
    fn prop_compare_consistent(n in arb_normal(), m in arb_normal()) {
        let (mut fpp, mut cpu) = setup(status::FD);
        fpp.ac[0] = n;
        fpp.ac[1] = m;
        fpp.execute(op(7, 0, 1), &mut cpu).unwrap(); // CMPF: operand - AC
        let key = |x: &[u16; 4]| -> i128 {
            let (sign, exp, mag) = decode(x);
            let k = ((exp as i128) << 57) | mag as i128;
            if sign { -k } else { k }
        };
        let cc = fpp.fps & status::CC_MASK;
        let (kn, km) = (key(&n), key(&m));
        if km == kn {
            prop_assert_eq!(cc, status::FZ);
        } else if km < kn {
            prop_assert_eq!(cc, status::FN);
        } else {
            prop_assert_eq!(cc, 0);
        }
    }

    /// Property: dividing and re-multiplying by the same value lands
    /// within one unit in the last place of the original, in
    /// round-to-nearest double precision.
    #[test]
    fn prop_divide_multiply_ulp(
        n_sign in any::<bool>(),
        n_exp in 120u16..=136,
        n_frac in (0u16..=0x7f, any::<u16>(), any::<u16>(), any::<u16>()),
        d_exp in 120u16..=136,
        d_frac in (0u16..=0x7f, any::<u16>(), any::<u16>(), any::<u16>()),
    ) {
        let sign_bit = if n_sign { 0x8000 } else { 0 };
        let n = [
            sign_bit | (n_exp << 7) | n_frac.0,
            n_frac.1, n_frac.2, n_frac.3,
        ];
        let d = [(d_exp << 7) | d_frac.0, d_frac.1, d_frac.2, d_frac.3];
        let (mut fpp, mut cpu) = setup(status::FD);
        fpp.ac[0] = n;
        fpp.ac[1] = d;
        fpp.execute(op(9, 0, 1), &mut cpu).unwrap(); // DIVF
        fpp.execute(op(2, 0, 1), &mut cpu).unwrap(); // MULF
        let r = fpp.ac[0];

        let (rs, re, rm) = decode(&r);
        let (ns, ne, nm) = decode(&n);
        let base = re.min(ne);
        let scaled = |sign: bool, exp: i32, mag: u64| -> i128 {
            let v = (mag as i128) << (exp - base);
            if sign { -v } else { v }
        };
        let diff = (scaled(rs, re, rm) - scaled(ns, ne, nm)).abs();
        let ulp = 1i128 << (ne - base);
        prop_assert!(diff <= ulp, "diff {} exceeds ulp {}", diff, ulp);
    }
}
