use super::utils::{self, combine_loss_fraction, LossFraction};

/// Describes an IEEE-754 binary interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Semantics {
    /// The number of bits that define the range of the exponent.
    pub exponent: usize,
    /// The number of bits in the significand (mantissa + 1).
    pub precision: usize,
}

impl Semantics {
    pub const fn new(exponent: usize, precision: usize) -> Self {
        Semantics {
            exponent,
            precision,
        }
    }
    /// Returns the precision in bits.
    pub fn get_precision(&self) -> usize {
        self.precision
    }
    /// Returns the length of the mantissa in bits (precision - 1).
    pub fn get_mantissa_len(&self) -> usize {
        self.precision - 1
    }
    /// Returns the length of the exponent in bits, which defines the valid
    /// range.
    pub fn get_exponent_len(&self) -> usize {
        self.exponent
    }

    /// Returns the exponent bias for the number, as a positive number.
    /// https://en.wikipedia.org/wiki/IEEE_754#Basic_and_interchange_formats
    pub(crate) fn get_bias(&self) -> i64 {
        let e = self.get_exponent_len();
        ((1u64 << (e - 1)) - 1) as i64
    }

    /// Returns the lower and upper bounds of the unbiased exponent of finite
    /// numbers.
    pub fn get_exp_bounds(&self) -> (i64, i64) {
        let exp_min: i64 = -self.get_bias() + 1;
        // The all-ones exponent is reserved for Inf and NaN.
        let exp_max: i64 = (1 << self.get_exponent_len()) - self.get_bias() - 2;
        (exp_min, exp_max)
    }
}

// IEEE 754-2019
// Table 3.5: Binary interchange format parameters.

/// Predefined FP16 float with 5 exponent bits, and 10 mantissa bits.
pub const FP16: Semantics = Semantics::new(5, 11);
/// Predefined FP32 float with 8 exponent bits, and 23 mantissa bits.
pub const FP32: Semantics = Semantics::new(8, 24);
/// Predefined FP64 float with 11 exponent bits, and 52 mantissa bits.
pub const FP64: Semantics = Semantics::new(11, 53);

/// Declare the different categories of the floating point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Infinity,
    NaN,
    Normal,
    Zero,
}

/// An unpacked floating-point number of some `Semantics`. Subnormals are
/// `Normal` numbers with the minimum exponent and no leading bit. For NaN
/// values the mantissa holds the payload bits.
#[derive(Debug, Clone, Copy)]
pub struct Float {
    // The semantics of the float (precision, exponent range).
    sem: Semantics,
    // The Sign bit.
    sign: bool,
    // The Exponent.
    exp: i64,
    // The significand, including the implicit bit, aligned to the right.
    // Format [00000001xxxxxxx].
    mantissa: u64,
    // The kind of number this float represents.
    category: Category,
}

impl Float {
    /// Create a new normal floating point number.
    pub fn new(sem: Semantics, sign: bool, exp: i64, mantissa: u64) -> Self {
        if mantissa == 0 {
            return Float::zero(sem, sign);
        }
        Float {
            sem,
            sign,
            exp,
            mantissa,
            category: Category::Normal,
        }
    }

    /// Create a floating point number without canonicalizing the fields.
    pub fn raw(
        sem: Semantics,
        sign: bool,
        exp: i64,
        mantissa: u64,
        category: Category,
    ) -> Self {
        Float {
            sem,
            sign,
            exp,
            mantissa,
            category,
        }
    }

    /// Returns a new zero float.
    pub fn zero(sem: Semantics, sign: bool) -> Self {
        Self::raw(sem, sign, 0, 0, Category::Zero)
    }

    /// Returns a new infinity float.
    pub fn inf(sem: Semantics, sign: bool) -> Self {
        Self::raw(sem, sign, 0, 0, Category::Infinity)
    }

    /// Returns a new NaN float carrying `payload` in its mantissa bits.
    pub fn nan(sem: Semantics, sign: bool, payload: u64) -> Self {
        let payload = payload & utils::mask(sem.get_mantissa_len());
        Self::raw(sem, sign, 0, payload, Category::NaN)
    }

    /// Returns true if the Float is +-inf.
    #[allow(dead_code)]
    pub fn is_inf(&self) -> bool {
        self.category == Category::Infinity
    }

    /// Returns true if the Float is a +- NaN.
    #[allow(dead_code)]
    pub fn is_nan(&self) -> bool {
        self.category == Category::NaN
    }

    /// Returns true if the Float is a +- zero.
    pub fn is_zero(&self) -> bool {
        self.category == Category::Zero
    }

    /// Returns true if this number is normal (not Zero, Nan, Inf).
    pub fn is_normal(&self) -> bool {
        self.category == Category::Normal
    }

    /// Return the semantics of the number
    pub fn get_semantics(&self) -> Semantics {
        self.sem
    }

    /// Returns the sign of the float. True means negative.
    pub fn get_sign(&self) -> bool {
        self.sign
    }

    /// Returns the mantissa of the float.
    pub fn get_mantissa(&self) -> u64 {
        self.mantissa
    }

    /// Returns the exponent of the float.
    pub fn get_exp(&self) -> i64 {
        self.exp
    }

    /// Returns the category of the float.
    pub fn get_category(&self) -> Category {
        self.category
    }

    /// Verify that the exponent is legal.
    pub(crate) fn check_bounds(&self) {
        if !self.is_normal() {
            return;
        }
        let bounds = self.sem.get_exp_bounds();
        debug_assert!(self.exp >= bounds.0);
        debug_assert!(self.exp <= bounds.1);
        debug_assert!(utils::msb_index(self.mantissa) <= self.sem.get_precision());
    }

    pub(crate) fn shift_significand_left(&mut self, amt: u64) {
        self.exp -= amt as i64;
        self.mantissa <<= amt;
    }

    pub(crate) fn shift_significand_right(&mut self, amt: u64) -> LossFraction {
        self.exp += amt as i64;
        let loss = LossFraction::for_shift(self.mantissa, amt as usize);
        self.mantissa = self.mantissa.checked_shr(amt as u32).unwrap_or(0);
        loss
    }

    /// Returns true if we need to round away from zero (increment the
    /// mantissa). Rounding is always to nearest, ties to even.
    pub(crate) fn need_round_away_from_zero(&self, loss: LossFraction) -> bool {
        debug_assert!(self.is_normal() || self.is_zero());
        if loss.is_mt_half() {
            return true;
        }
        loss.is_exactly_half() && self.mantissa & 1 == 1
    }

    /// Normalize the number by adjusting the exponent to the legal range, shift
    /// the mantissa to the msb, and round the number if bits are lost. This is
    /// based on Neil Booth' implementation in APFloat.
    pub(crate) fn normalize(&mut self, loss: LossFraction) {
        if !self.is_normal() {
            return;
        }
        let mut loss = loss;
        let bounds = self.sem.get_exp_bounds();

        let nmsb = utils::msb_index(self.mantissa) as i64;

        // Step I - adjust the exponent.
        if nmsb > 0 {
            // Align the number so that the MSB bit will be MANTISSA + 1.
            let mut exp_change = nmsb - self.sem.get_precision() as i64;

            // Handle overflowing exponents.
            if self.exp + exp_change > bounds.1 {
                *self = Self::inf(self.sem, self.sign);
                return;
            }

            // Handle underflowing low exponents. Don't allow to go below the
            // legal exponent range.
            if self.exp + exp_change < bounds.0 {
                exp_change = bounds.0 - self.exp;
            }

            if exp_change < 0 {
                // Handle reducing the exponent.
                debug_assert!(loss.is_exactly_zero(), "losing information");
                self.shift_significand_left(-exp_change as u64);
                self.check_bounds();
                return;
            }

            if exp_change > 0 {
                // Handle increasing the exponent.
                let loss2 = self.shift_significand_right(exp_change as u64);
                loss = combine_loss_fraction(loss2, loss);
            }
        }

        //Step II - round the number.

        // If nothing moved or the shift didn't mess things up then we're done.
        if loss.is_exactly_zero() {
            // Canonicalize to zero.
            if self.mantissa == 0 {
                *self = Self::zero(self.sem, self.sign);
            }
            self.check_bounds();
            return;
        }

        if self.need_round_away_from_zero(loss) {
            if self.mantissa == 0 {
                self.exp = bounds.0
            }

            self.mantissa += 1;
            // Did the mantissa overflow?
            if self.mantissa >> self.sem.get_precision() != 0 {
                // Can we fix the exponent?
                if self.exp < bounds.1 {
                    self.shift_significand_right(1);
                } else {
                    *self = Self::inf(self.sem, self.sign);
                    return;
                }
            }
        }

        // Canonicalize.
        if self.mantissa == 0 {
            *self = Self::zero(self.sem, self.sign);
        }
        self.check_bounds();
    }
}

#[test]
fn test_exp_bounds() {
    assert_eq!(FP16.get_bias(), 15);
    assert_eq!(FP32.get_bias(), 127);
    assert_eq!(FP64.get_bias(), 1023);
    assert_eq!(FP16.get_exp_bounds(), (-14, 15));
    assert_eq!(FP32.get_exp_bounds(), (-126, 127));
    assert_eq!(FP64.get_exp_bounds(), (-1022, 1023));
}

#[test]
fn test_normalize_aligns_mantissa() {
    // The value 6, with the msb far below the precision.
    let mut x = Float::new(FP16, false, 11, 3);
    x.normalize(LossFraction::ExactlyZero);
    assert!(x.is_normal());
    assert_eq!(x.get_mantissa(), 0b11 << 9);
    assert_eq!(x.get_exp(), 2);
}

#[test]
fn test_normalize_rounds_ties_to_even() {
    // 0b1_0000000000_1: a tie, rounds down to the even value.
    let mut x = Float::new(FP16, false, 0, 0b1_0000000000_1);
    x.normalize(LossFraction::ExactlyZero);
    assert_eq!(x.get_mantissa(), 0b1_0000000000);
    assert_eq!(x.get_exp(), 1);

    // 0b1_0000000001_1: a tie with an odd lsb, rounds up.
    let mut x = Float::new(FP16, false, 0, 0b1_0000000001_1);
    x.normalize(LossFraction::ExactlyZero);
    assert_eq!(x.get_mantissa(), 0b1_0000000010);

    // A sticky bit below the tie breaks it upwards.
    let mut x = Float::new(FP16, false, 0, 0b1_0000000000_1);
    x.normalize(LossFraction::LessThanHalf);
    assert_eq!(x.get_mantissa(), 0b1_0000000001);
}

#[test]
fn test_normalize_carry_and_overflow() {
    // All ones plus a tie carries into the next binade.
    let mut x = Float::new(FP16, false, 0, 0b1_1111111111_1);
    x.normalize(LossFraction::ExactlyZero);
    assert_eq!(x.get_mantissa(), 0b1_0000000000);
    assert_eq!(x.get_exp(), 2);

    // The same carry at the top of the range overflows to infinity.
    let mut x = Float::new(FP16, true, 14, 0b1_1111111111_1);
    x.normalize(LossFraction::ExactlyZero);
    assert!(x.is_inf());
    assert!(x.get_sign());

    // An exponent beyond the range overflows immediately.
    let mut x = Float::new(FP16, false, 40, 1);
    x.normalize(LossFraction::ExactlyZero);
    assert!(x.is_inf());
}

#[test]
fn test_normalize_underflow() {
    // Far below the smallest subnormal: rounds to a signed zero.
    let mut x = Float::new(FP16, true, -100, 1 << 20);
    x.normalize(LossFraction::ExactlyZero);
    assert!(x.is_zero());
    assert!(x.get_sign());

    // Clamped to the minimum exponent, this keeps a subnormal mantissa.
    let mut x = Float::new(FP16, false, -10, 1);
    x.normalize(LossFraction::ExactlyZero);
    assert!(x.is_normal());
    assert_eq!(x.get_exp(), -14);
    assert_eq!(x.get_mantissa(), 1 << 4);
}
