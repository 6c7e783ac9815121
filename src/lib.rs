//! Bit-exact conversion between IEEE 754 binary16 (half precision) and the
//! native fp32 type.
//!
//! ```
//!    use halfconv::{decode, encode, Half};
//!
//!    let bits = encode(3.14159);
//!    assert_eq!(bits, 0x4248);
//!    assert_eq!(decode(bits), 3.140625);
//!    assert_eq!(Half::from_bits(bits).to_f64(), 3.140625);
//! ```

#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

mod cast;
mod float;
mod half;
#[cfg(feature = "python")]
mod py;
mod utils;

pub use self::half::{decode, encode, Half};
