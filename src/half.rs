//! This module contains the public half-precision codec: the `decode` and
//! `encode` functions and the `Half` container type.

use super::float::Float;

/// Converts the binary16 bit pattern `bits` into an fp32 value.
///
/// The conversion is exact for every finite input, including subnormals and
/// signed zeros. Infinities keep their sign. NaN inputs produce a quiet NaN
/// with the same sign, and the payload bits moved to the top of the fp32
/// mantissa.
///
/// # Examples
///
/// ```
///    use halfconv::decode;
///
///    assert_eq!(decode(0x3c00), 1.0);
///    assert_eq!(decode(0xc400), -4.0);
///    assert!(decode(0x7e00).is_nan());
/// ```
pub fn decode(bits: u16) -> f32 {
    Float::from_f16_bits(bits).as_f32()
}

/// Converts the fp32 value `value` into the nearest binary16 bit pattern.
///
/// Rounding is to nearest, ties to even. Magnitudes that round above the
/// largest finite half (65504) become a signed infinity, and magnitudes below
/// half of the smallest subnormal become a signed zero. NaN inputs produce a
/// quiet NaN with the same sign, and the high payload bits. This function never
/// fails.
///
/// # Examples
///
/// ```
///    use halfconv::encode;
///
///    assert_eq!(encode(1.0), 0x3c00);
///    assert_eq!(encode(65504.0), 0x7bff);
///    assert_eq!(encode(65520.0), 0x7c00);
/// ```
pub fn encode(value: f32) -> u16 {
    Float::from_f32(value).as_f16_bits()
}

/// A 16-bit IEEE-754 binary16 value, stored as its raw bit pattern.
///
/// `Half` is a transfer container: it does not implement arithmetic. Equality
/// and hashing compare the stored bits, so `+0` and `-0` are different values
/// and two NaNs with the same bits are equal.
///
/// # Examples
///
/// ```
///    use halfconv::Half;
///
///    let mut h = Half::from_f32(1.5);
///    assert_eq!(h.to_bits(), 0x3e00);
///    h.set_f32(-2.0);
///    assert_eq!(f32::from(h), -2.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Half {
    bits: u16,
}

impl Half {
    /// Positive zero.
    pub const ZERO: Half = Half::from_bits(0x0000);
    /// Negative zero.
    pub const NEG_ZERO: Half = Half::from_bits(0x8000);
    /// The value one.
    pub const ONE: Half = Half::from_bits(0x3c00);
    /// The largest finite value, 65504.
    pub const MAX: Half = Half::from_bits(0x7bff);
    /// The smallest positive subnormal value, 2^-24.
    pub const MIN_POSITIVE_SUBNORMAL: Half = Half::from_bits(0x0001);
    /// Positive infinity.
    pub const INFINITY: Half = Half::from_bits(0x7c00);
    /// Negative infinity.
    pub const NEG_INFINITY: Half = Half::from_bits(0xfc00);
    /// The canonical quiet NaN.
    pub const NAN: Half = Half::from_bits(0x7e00);

    /// Wrap a raw binary16 bit pattern. Every pattern is legal.
    pub const fn from_bits(bits: u16) -> Self {
        Half { bits }
    }

    /// Returns the raw binary16 bit pattern.
    pub const fn to_bits(self) -> u16 {
        self.bits
    }

    /// Rounds `value` to the nearest half. See [`encode`].
    pub fn from_f32(value: f32) -> Self {
        Self::from_bits(encode(value))
    }

    /// Rounds `value` directly to the nearest half, without an intermediate
    /// fp32 rounding step.
    pub fn from_f64(value: f64) -> Self {
        Self::from_bits(Float::from_f64(value).as_f16_bits())
    }

    /// Returns the value as fp32. See [`decode`].
    pub fn to_f32(self) -> f32 {
        decode(self.bits)
    }

    /// Returns the value as fp64. The conversion is exact.
    pub fn to_f64(self) -> f64 {
        Float::from_f16_bits(self.bits).as_f64()
    }

    /// Replace the stored value with `value`, rounded to the nearest half.
    pub fn set_f32(&mut self, value: f32) {
        self.bits = encode(value);
    }

    /// Returns true if this is a NaN of any payload.
    pub const fn is_nan(self) -> bool {
        self.bits & 0x7c00 == 0x7c00 && self.bits & 0x03ff != 0
    }

    /// Returns true if this is +-inf.
    pub const fn is_infinite(self) -> bool {
        self.bits & 0x7fff == 0x7c00
    }

    /// Returns true if the sign bit is set, including -0 and negative NaNs.
    pub const fn is_sign_negative(self) -> bool {
        self.bits & 0x8000 != 0
    }
}

impl From<f32> for Half {
    fn from(value: f32) -> Self {
        Half::from_f32(value)
    }
}

impl From<Half> for f32 {
    fn from(value: Half) -> Self {
        value.to_f32()
    }
}

impl From<Half> for f64 {
    fn from(value: Half) -> Self {
        value.to_f64()
    }
}

#[test]
fn test_decode_boundaries() {
    assert_eq!(decode(0x0000).to_bits(), 0.0f32.to_bits());
    assert_eq!(decode(0x8000).to_bits(), (-0.0f32).to_bits());
    assert_eq!(decode(0x3c00), 1.0);
    assert_eq!(decode(0x7c00), f32::INFINITY);
    assert_eq!(decode(0xfc00), f32::NEG_INFINITY);
    assert!(decode(0x7e00).is_nan());
    assert!(decode(0xfe00).is_sign_negative());
    assert_eq!(decode(0x7bff), 65504.0);
    assert_eq!(decode(0x0001), f32::from_bits(0x3380_0000));
    assert_eq!(decode(0x03ff), 0.000060975552);
}

#[test]
fn test_decode_rfc7049_vectors() {
    // RFC 7049, Appendix A. Examples (major type 7, additional info 25).
    assert_eq!(decode(0x3e00), 1.5);
    assert_eq!(decode(0x0400), 0.00006103515625);
    assert_eq!(decode(0xc400), -4.0);
    assert_eq!(decode(0x7bff), 65504.0);
    assert_eq!(decode(0x0001), 5.960464477539063e-8);
}

#[test]
fn test_encode_boundaries() {
    assert_eq!(encode(65504.0), 0x7bff);
    assert_eq!(encode(65520.0), 0x7c00);
    assert_eq!(encode(-65520.0), 0xfc00);
    // The largest fp32 below the overflow tie.
    assert_eq!(encode(f32::from_bits(0x477f_efff)), 0x7bff);
    assert_eq!(encode(f32::MAX), 0x7c00);
    assert_eq!(encode(5.96046e-8), 0x0001);
    assert_eq!(encode(2.98e-8), 0x0000);
    assert_eq!(encode(-2.98e-8), 0x8000);
    assert_eq!(encode(f32::from_bits(0x0000_0001)), 0x0000);
    assert_eq!(encode(0.0), 0x0000);
    assert_eq!(encode(-0.0), 0x8000);
    assert_eq!(encode(f32::INFINITY), 0x7c00);
    assert_eq!(encode(f32::NEG_INFINITY), 0xfc00);
    assert_eq!(encode(f32::NAN) & 0x7e00, 0x7e00);
    assert_eq!(encode(-f32::NAN) & 0x8000, 0x8000);
}

#[test]
fn test_encode_ties_to_even() {
    // 1 + 2^-10 is exactly representable.
    assert_eq!(encode(1.0009765625), 0x3c01);
    // 1 + 2^-11 sits half-way between 0x3c00 and 0x3c01: even wins.
    assert_eq!(encode(f32::from_bits(0x3f80_1000)), 0x3c00);
    // 1 + 3 * 2^-11 sits half-way between 0x3c01 and 0x3c02: even wins.
    assert_eq!(encode(f32::from_bits(0x3f80_3000)), 0x3c02);
    // Just off the tie, the nearest value wins.
    assert_eq!(encode(f32::from_bits(0x3f80_1001)), 0x3c01);
    assert_eq!(encode(f32::from_bits(0x3f80_0fff)), 0x3c00);
    // 2^-25 sits half-way between zero and the smallest subnormal.
    assert_eq!(encode(f32::from_bits(0x3300_0000)), 0x0000);
    // 3 * 2^-25 sits half-way between the first two subnormals.
    assert_eq!(encode(f32::from_bits(0x33c0_0000)), 0x0002);
    // Above the largest subnormal, rounds up into the smallest normal.
    assert_eq!(encode(f32::from_bits(0x387f_f000)), 0x0400);
}

#[test]
fn test_encode_picks_nearest() {
    // 0.1 is not representable; the neighbours are 0x2e66 and 0x2e67.
    let h = encode(0.1);
    assert_eq!(h, 0x2e66);
    let below = 0.1f32 as f64 - decode(0x2e66) as f64;
    let above = decode(0x2e67) as f64 - 0.1f32 as f64;
    assert!(below > 0.);
    assert!(below < above);
    assert_ne!(decode(h), 0.1);

    assert_eq!(encode(core::f32::consts::PI), 0x4248);
    assert_eq!(encode(100000.0), 0x7c00);
}

#[test]
fn test_round_trip_all_halves() {
    for bits in 0..=u16::MAX {
        let h = Half::from_bits(bits);
        let back = encode(decode(bits));
        if h.is_nan() {
            // NaNs come back quiet, with sign and payload intact.
            assert_eq!(back, bits | 0x0200);
        } else {
            assert_eq!(back, bits);
            assert_eq!(Half::from_f64(h.to_f64()), h);
        }
    }
}

#[test]
fn test_decode_is_deterministic() {
    for bits in 0..=u16::MAX {
        assert_eq!(decode(bits).to_bits(), decode(bits).to_bits());
    }
}

#[test]
fn test_decode_matches_reference() {
    for bits in 0..=u16::MAX {
        let expected = ::half::f16::from_bits(bits).to_f32();
        let actual = decode(bits);
        if expected.is_nan() {
            assert!(actual.is_nan(), "{:#06x}", bits);
            assert_eq!(
                expected.is_sign_negative(),
                actual.is_sign_negative(),
                "{:#06x}",
                bits
            );
        } else {
            assert_eq!(expected.to_bits(), actual.to_bits(), "{:#06x}", bits);
        }
        let expected = ::half::f16::from_bits(bits).to_f64();
        let actual = Half::from_bits(bits).to_f64();
        assert!(expected.is_nan() || expected.to_bits() == actual.to_bits());
    }
}

#[cfg(test)]
fn check_encode_against_reference(value: f32) {
    let expected = ::half::f16::from_f32(value);
    let actual = encode(value);
    if value.is_nan() {
        assert!(Half::from_bits(actual).is_nan(), "{:#010x}", value.to_bits());
        assert_eq!(
            Half::from_bits(actual).is_sign_negative(),
            value.is_sign_negative()
        );
    } else {
        assert_eq!(expected.to_bits(), actual, "{:#010x}", value.to_bits());
    }
}

#[test]
fn test_encode_matches_reference() {
    use super::utils::{get_special_test_values, Lfsr};

    for v in get_special_test_values() {
        check_encode_against_reference(v);
    }

    // A strided sweep across the whole fp32 space.
    for bits in (0..=u32::MAX).step_by(4099) {
        check_encode_against_reference(f32::from_bits(bits));
    }

    // Random values, concentrated in the half range.
    let mut lfsr = Lfsr::new();
    for _ in 0..100000 {
        let r = lfsr.get();
        check_encode_against_reference(f32::from_bits(r));
        let in_range = (r & 0x807f_ffff) | ((0x66 + (r >> 23) % 0x20) << 23);
        check_encode_against_reference(f32::from_bits(in_range));
    }
}

#[test]
fn test_encode_every_midpoint() {
    // Every pair of adjacent finite halves, and the fp32 value half-way
    // between them.
    for bits in 0..0x7bffu16 {
        let lo = decode(bits) as f64;
        let hi = decode(bits + 1) as f64;
        let mid = ((lo + hi) / 2.) as f32;
        assert_eq!((lo + hi) / 2., mid as f64);
        let even = if bits & 1 == 0 { bits } else { bits + 1 };
        assert_eq!(encode(mid), even);
        assert_eq!(encode(-mid), even | 0x8000);
        assert_eq!(::half::f16::from_f32(mid).to_bits(), even);
    }
}

#[test]
fn test_from_f64_single_rounding() {
    // Just above the tie between 1.0 and 1 + 2^-10. Rounding to fp32 first
    // would land exactly on the tie and round down.
    let v = f64::from_bits(0x3ff0_0200_0000_1000);
    assert_eq!(v, 1.0 + 0.00048828125 + 9.094947017729282e-13);
    assert_eq!((v as f32).to_bits(), 0x3f80_1000);
    assert_eq!(Half::from_f32(v as f32).to_bits(), 0x3c00);
    assert_eq!(Half::from_f64(v).to_bits(), 0x3c01);
    assert_eq!(Half::from_f64(65504.0), Half::MAX);
    assert_eq!(Half::from_f64(1e300), Half::INFINITY);
    assert!(Half::from_f64(f64::NAN).is_nan());
}

#[test]
fn test_half_container() {
    let mut h = Half::default();
    assert_eq!(h, Half::ZERO);
    assert_ne!(Half::ZERO, Half::NEG_ZERO);
    assert_eq!(Half::NAN, Half::from_bits(0x7e00));

    h.set_f32(1.5);
    assert_eq!(h.to_bits(), 0x3e00);
    assert_eq!(f32::from(h), 1.5);
    assert_eq!(f64::from(h), 1.5);
    assert_eq!(Half::from(-4.0f32).to_bits(), 0xc400);

    assert!(Half::NAN.is_nan());
    assert!(!Half::NAN.is_infinite());
    assert!(Half::NEG_INFINITY.is_infinite());
    assert!(Half::NEG_INFINITY.is_sign_negative());
    assert!(!Half::INFINITY.is_nan());
    assert!(Half::NEG_ZERO.is_sign_negative());
    assert!(!Half::MAX.is_infinite());
    assert_eq!(Half::MAX.to_f32(), 65504.0);
    assert_eq!(Half::MIN_POSITIVE_SUBNORMAL.to_f64(), 5.9604644775390625e-8);
    assert_eq!(Half::ONE.to_f32(), 1.0);
}
