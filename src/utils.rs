//! This file contains simple helper functions and test helpers.

/// Returns a mask full of 1s, of `b` bits.
pub fn mask(b: usize) -> u64 {
    debug_assert!(b < 64);
    (1 << b) - 1
}

/// Returns the 1-based index of the most significant set bit, or zero if
/// `val` is zero.
pub fn msb_index(val: u64) -> usize {
    (u64::BITS - val.leading_zeros()) as usize
}

/// Reports the kind of values that are lost when we shift right bits. In some
/// context this used as the two guard bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LossFraction {
    ExactlyZero,  //0000000
    LessThanHalf, //0xxxxxx
    ExactlyHalf,  //1000000
    MoreThanHalf, //1xxxxxx
}

impl LossFraction {
    pub fn is_exactly_zero(&self) -> bool {
        matches!(self, Self::ExactlyZero)
    }
    pub fn is_exactly_half(&self) -> bool {
        matches!(self, Self::ExactlyHalf)
    }
    pub fn is_mt_half(&self) -> bool {
        matches!(self, Self::MoreThanHalf)
    }

    /// Classify the bits that fall off when `val` is shifted right by `bits`.
    pub fn for_shift(val: u64, bits: usize) -> LossFraction {
        if bits == 0 {
            return LossFraction::ExactlyZero;
        }
        // Everything is lost, and the half-point is above the highest bit.
        if bits > u64::BITS as usize {
            if val == 0 {
                return LossFraction::ExactlyZero;
            }
            return LossFraction::LessThanHalf;
        }
        let val = val as u128;
        let lost = val & ((1u128 << bits) - 1);
        let half = 1u128 << (bits - 1);
        if lost == 0 {
            LossFraction::ExactlyZero
        } else if lost < half {
            LossFraction::LessThanHalf
        } else if lost == half {
            LossFraction::ExactlyHalf
        } else {
            LossFraction::MoreThanHalf
        }
    }
}

/// Combine the loss of accuracy with `msb` more significant and `lsb`
/// less significant.
pub(crate) fn combine_loss_fraction(
    msb: LossFraction,
    lsb: LossFraction,
) -> LossFraction {
    if !lsb.is_exactly_zero() {
        if msb.is_exactly_zero() {
            return LossFraction::LessThanHalf;
        } else if msb.is_exactly_half() {
            return LossFraction::MoreThanHalf;
        }
    }
    msb
}

#[test]
fn test_masking() {
    assert_eq!(mask(0), 0x0);
    assert_eq!(mask(1), 0x1);
    assert_eq!(mask(8), 255);
    assert_eq!(mask(52), 0xf_ffff_ffff_ffff);
}

#[test]
fn test_msb() {
    assert_eq!(msb_index(0), 0);
    assert_eq!(msb_index(1), 1);
    assert_eq!(msb_index(0x400), 11);
    assert_eq!(msb_index(u64::MAX), 64);
}

#[test]
fn test_loss_for_shift() {
    use LossFraction::*;
    assert_eq!(LossFraction::for_shift(0b10000000, 3), ExactlyZero);
    assert_eq!(LossFraction::for_shift(0b10000111, 3), MoreThanHalf);
    assert_eq!(LossFraction::for_shift(0b10000100, 3), ExactlyHalf);
    assert_eq!(LossFraction::for_shift(0b10000001, 3), LessThanHalf);
    assert_eq!(LossFraction::for_shift(0b111, 0), ExactlyZero);
    assert_eq!(LossFraction::for_shift(1 << 63, 64), ExactlyHalf);
    assert_eq!(LossFraction::for_shift(u64::MAX, 125), LessThanHalf);
    assert_eq!(LossFraction::for_shift(0, 125), ExactlyZero);
}

#[test]
fn test_combine_loss() {
    use LossFraction::*;
    assert_eq!(combine_loss_fraction(ExactlyZero, ExactlyZero), ExactlyZero);
    assert_eq!(combine_loss_fraction(ExactlyZero, MoreThanHalf), LessThanHalf);
    assert_eq!(combine_loss_fraction(ExactlyHalf, LessThanHalf), MoreThanHalf);
    assert_eq!(combine_loss_fraction(ExactlyHalf, ExactlyZero), ExactlyHalf);
    assert_eq!(combine_loss_fraction(LessThanHalf, ExactlyHalf), LessThanHalf);
}

/// Returns list of interesting values that various tests use to catch edge cases.
#[cfg(test)]
pub fn get_special_test_values() -> [f32; 22] {
    [
        -f32::NAN,
        f32::NAN,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::EPSILON,
        -f32::EPSILON,
        f32::MIN_POSITIVE,
        f32::from_bits(0x0000_0001),
        f32::MIN,
        f32::MAX,
        core::f32::consts::PI,
        core::f32::consts::LN_2,
        core::f32::consts::E,
        0.0,
        -0.0,
        10.,
        -10.,
        -0.00001,
        0.1,
        65504.,
        65520.,
        6.1035156e-5,
    ]
}

// Linear-feedback shift register. We use this as a random number generator for
// tests.
#[cfg(test)]
pub struct Lfsr {
    state: u32,
}

#[cfg(test)]
impl Lfsr {
    /// Generate a new LFSR number generator.
    pub fn new() -> Lfsr {
        Lfsr { state: 0x13371337 }
    }

    fn step(&mut self) {
        let a = (self.state >> 24) & 1;
        let b = (self.state >> 23) & 1;
        let c = (self.state >> 22) & 1;
        let d = (self.state >> 17) & 1;
        let n = a ^ b ^ c ^ d ^ 1;
        self.state <<= 1;
        self.state |= n;
    }

    pub fn get(&mut self) -> u32 {
        let mut res: u32 = 0;
        for _ in 0..32 {
            self.step();
            res <<= 1;
            res ^= self.state & 0x1;
        }
        res
    }
}

#[test]
fn test_lfsr_balance() {
    let mut lfsr = Lfsr::new();

    // Count the number of items, and the number of 1s.
    let mut items = 0;
    let mut ones = 0;

    for _ in 0..10000 {
        let mut u = lfsr.get();
        for _ in 0..32 {
            items += 1;
            ones += u & 1;
            u >>= 1;
        }
    }
    // Make sure that we have around 50% 1s and 50% zeros.
    assert!((ones as f64) < (0.55 * items as f64));
    assert!((ones as f64) > (0.45 * items as f64));
}
