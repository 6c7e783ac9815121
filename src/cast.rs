use super::float::{Category, Float, Semantics, FP16, FP32, FP64};
use super::utils::{mask, LossFraction};

impl Float {
    /// Unpack the interchange encoding `float` of the format `sem`. Every bit
    /// pattern is legal.
    pub fn from_bits(sem: Semantics, float: u64) -> Self {
        let mantissa_len = sem.get_mantissa_len();
        let exponent_len = sem.get_exponent_len();

        // Extract the biased exponent (wipe the sign and mantissa).
        let biased_exp = ((float >> mantissa_len) & mask(exponent_len)) as i64;
        // Wipe the exponent and mantissa.
        let sign = (float >> (exponent_len + mantissa_len)) & 1 == 1;
        // Wipe the sign and exponent.
        let mut mantissa = float & mask(mantissa_len);

        // Check for NaN/Inf
        if biased_exp == mask(exponent_len) as i64 {
            if mantissa == 0 {
                return Self::inf(sem, sign);
            }
            return Self::nan(sem, sign, mantissa);
        }

        let mut exp = biased_exp - sem.get_bias();

        // Add the implicit bit for normal numbers.
        if biased_exp != 0 {
            mantissa += 1u64 << mantissa_len;
        } else {
            // Handle denormals, adjust the exponent to the legal range.
            exp += 1;
        }

        Self::new(sem, sign, exp, mantissa)
    }

    /// Pack the number into the interchange encoding of its semantics.
    pub fn as_bits(&self) -> u64 {
        // https://en.wikipedia.org/wiki/IEEE_754
        let sem = self.get_semantics();
        let mantissa_len = sem.get_mantissa_len();
        let exponent_len = sem.get_exponent_len();

        let mantissa: u64;
        let mut exp: u64;
        match self.get_category() {
            Category::Infinity => {
                mantissa = 0;
                exp = mask(exponent_len);
            }
            Category::NaN => {
                // Always quiet, keep whatever payload survived.
                mantissa = (1 << (mantissa_len - 1)) | self.get_mantissa();
                exp = mask(exponent_len);
            }
            Category::Zero => {
                mantissa = 0;
                exp = 0;
            }
            Category::Normal => {
                exp = (self.get_exp() + sem.get_bias()) as u64;
                debug_assert!(exp > 0);
                let m = self.get_mantissa();
                // Encode denormals. If the exponent is the minimum value and we
                // don't have a leading integer bit (in the form 1.mmmm) then
                // this is a denormal value and we need to encode it as such.
                if (exp == 1) && ((m >> mantissa_len) == 0) {
                    exp = 0;
                }
                mantissa = m & mask(mantissa_len);
            }
        }

        let mut bits: u64 = self.get_sign() as u64;
        bits <<= exponent_len;
        bits |= exp;
        bits <<= mantissa_len;
        debug_assert!(mantissa <= mask(mantissa_len));
        bits |= mantissa;
        bits
    }

    /// Convert from one float format to another, rounding to nearest-even.
    /// Widening conversions are exact.
    pub fn cast(&self, sem: Semantics) -> Float {
        let from = self.get_semantics();
        let sign = self.get_sign();
        match self.get_category() {
            Category::Zero => Self::zero(sem, sign),
            Category::Infinity => Self::inf(sem, sign),
            Category::NaN => {
                // Keep the high payload bits, aligned to the new width.
                let payload = self.get_mantissa();
                let to_len = sem.get_mantissa_len();
                let from_len = from.get_mantissa_len();
                let payload = if to_len >= from_len {
                    payload << (to_len - from_len)
                } else {
                    payload >> (from_len - to_len)
                };
                Self::nan(sem, sign, payload)
            }
            Category::Normal => {
                let exp_delta =
                    from.get_mantissa_len() as i64 - sem.get_mantissa_len() as i64;
                let mut x = Self::raw(
                    sem,
                    sign,
                    self.get_exp() - exp_delta,
                    self.get_mantissa(),
                    Category::Normal,
                );
                // Don't normalize if this is a nop conversion.
                if from != sem {
                    x.normalize(LossFraction::ExactlyZero);
                }
                x
            }
        }
    }

    /// Loads a native fp32 value.
    pub fn from_f32(float: f32) -> Self {
        Self::from_bits(FP32, float.to_bits() as u64)
    }

    /// Loads a native fp64 value.
    pub fn from_f64(float: f64) -> Self {
        Self::from_bits(FP64, float.to_bits())
    }

    /// Loads an fp16 bit pattern.
    pub fn from_f16_bits(bits: u16) -> Self {
        Self::from_bits(FP16, bits as u64)
    }

    /// Convert this float to fp32. Notice that the number may overflow or
    /// rounded to the nearest even.
    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.cast(FP32).as_bits() as u32)
    }

    /// Convert this float to fp64. Notice that the number may overflow or
    /// rounded to the nearest even.
    pub fn as_f64(&self) -> f64 {
        f64::from_bits(self.cast(FP64).as_bits())
    }

    /// Convert this float to an fp16 bit pattern. Notice that the number may
    /// overflow or rounded to the nearest even.
    pub fn as_f16_bits(&self) -> u16 {
        self.cast(FP16).as_bits() as u16
    }
}

#[test]
fn test_unpack_fp16() {
    let one = Float::from_f16_bits(0x3c00);
    assert!(one.is_normal());
    assert_eq!(one.get_exp(), 0);
    assert_eq!(one.get_mantissa(), 1 << 10);

    let tiny = Float::from_f16_bits(0x0001);
    assert!(tiny.is_normal());
    assert_eq!(tiny.get_exp(), -14);
    assert_eq!(tiny.get_mantissa(), 1);

    let neg_zero = Float::from_f16_bits(0x8000);
    assert!(neg_zero.is_zero());
    assert!(neg_zero.get_sign());

    assert!(Float::from_f16_bits(0x7c00).is_inf());
    assert!(Float::from_f16_bits(0xfc00).is_inf());
    assert!(Float::from_f16_bits(0x7c01).is_nan());
    assert!(Float::from_f16_bits(0xfe00).get_sign());
}

#[test]
fn test_pack_unpack_all_f16() {
    // Every non-NaN pattern survives an unpack and pack unchanged.
    for bits in 0..=u16::MAX {
        let a = Float::from_f16_bits(bits);
        if a.is_nan() {
            assert_eq!(a.as_bits() as u16, bits | 0x0200);
        } else {
            assert_eq!(a.as_bits() as u16, bits);
        }
    }
}

#[test]
fn test_round_trip_native_float_cast() {
    let f = f32::from_bits(0x41700000);
    let a = Float::from_f32(f);
    assert_eq!(f, a.as_f32());

    let pi = 355. / 113.;
    let a = Float::from_f64(pi);
    assert_eq!(pi, a.as_f64());

    assert!(Float::from_f64(f64::NAN).is_nan());
    assert!(!Float::from_f64(f64::NAN).is_inf());
    assert!(Float::from_f64(f64::INFINITY).is_inf());
    assert!(!Float::from_f64(f64::INFINITY).is_nan());
    assert!(Float::from_f64(f64::NEG_INFINITY).is_inf());

    let a_float = f32::from_bits(0x3f8fffff);
    let a = Float::from_f32(a_float).cast(FP64);
    assert_eq!(a.as_f32(), a_float);

    let f = f32::from_bits(0x000000);
    let a = Float::from_f32(f);
    assert!(!a.is_normal());
    assert_eq!(f, a.as_f32());
}

#[test]
fn test_cast_zero_nan_inf() {
    {
        let a = Float::from_f32(f32::from_bits(0xff800000)); // -Inf
        let b = a.cast(FP16);
        assert!(b.is_inf());
        assert!(!b.is_nan());
        assert!(b.get_sign());
    }
    {
        let a = Float::from_f32(f32::from_bits(0xffc00000)); // -Nan.
        let b = a.cast(FP16);
        assert!(!b.is_inf());
        assert!(b.is_nan());
        assert!(b.get_sign());
    }
    {
        // A signaling NaN whose payload lives in the low bits only.
        let a = Float::from_f32(f32::from_bits(0x7f800001));
        let b = a.cast(FP16);
        assert!(b.is_nan());
        assert_eq!(b.as_bits(), 0x7e00);
    }
    {
        let a = Float::from_f32(-0.0).cast(FP16);
        assert!(a.is_zero());
        assert!(a.get_sign());
    }
}

#[test]
fn test_cast_nan_payload() {
    // Widening shifts the payload up and sets the quiet bit.
    let a = Float::from_f16_bits(0x7c01);
    assert_eq!(a.as_f32().to_bits(), 0x7fc0_2000);
    let a = Float::from_f16_bits(0xfd55);
    assert_eq!(a.as_f32().to_bits(), 0xffea_a000);

    // Narrowing drops the low payload bits.
    let a = Float::from_f32(f32::from_bits(0x7fc0_2fff));
    assert_eq!(a.as_f16_bits(), 0x7e01);
}

#[test]
fn test_cast_down_matches_hardware() {
    // fp64 -> fp32 must agree with the native `as` conversion.
    for v in [0.3, 0.1, 14151241515., 14151215., 0.0000000001, 1000000000.] {
        let res = Float::from_f64(v).as_f32();
        assert_eq!(Float::from_f64(v).as_f64().to_bits(), v.to_bits());
        assert_eq!(res, v as f32);
    }

    for v in super::utils::get_special_test_values() {
        let v = v as f64;
        let res = Float::from_f64(v).as_f32();
        assert_eq!(v.is_nan(), res.is_nan());
        assert!(v.is_nan() || res.to_bits() == (v as f32).to_bits());
    }
}

#[test]
fn test_load_store_all_f32() {
    // Try to load and store normals and denormals.
    for i in 0..(1u64 << 16) {
        let in_f = f32::from_bits((i << 16 | i) as u32);
        let fp_f = Float::from_f32(in_f);
        let out_f = fp_f.as_f32();
        assert_eq!(in_f.is_nan(), out_f.is_nan());
        assert_eq!(in_f.is_infinite(), out_f.is_infinite());
        assert!(in_f.is_nan() || (in_f.to_bits() == out_f.to_bits()));
    }
}
