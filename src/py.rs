use crate::{decode, encode, Half};
use pyo3::prelude::*;
use std::format;
use std::string::String;

/// A half-precision (binary16) value, stored as its raw bit pattern.
///
/// Equality and hashing use the bit pattern, so +0 and -0 differ.
#[pyclass(name = "Half")]
struct PyHalf {
    inner: Half,
}

#[pymethods]
impl PyHalf {
    /// Create a new half from a Python float, rounding to nearest-even.
    ///
    /// Args:
    ///     value: The value to round
    #[new]
    fn new(value: f64) -> Self {
        PyHalf {
            inner: Half::from_f64(value),
        }
    }

    /// Create a new half from its 16-bit pattern.
    ///
    /// Args:
    ///     bits: The raw binary16 bits (0..=0xFFFF)
    #[staticmethod]
    fn from_bits(bits: u16) -> Self {
        PyHalf {
            inner: Half::from_bits(bits),
        }
    }

    /// Returns the raw binary16 bits.
    #[getter]
    fn bits(&self) -> u16 {
        self.inner.to_bits()
    }

    /// Returns true if the half is a NaN.
    fn is_nan(&self) -> bool {
        self.inner.is_nan()
    }

    /// Returns true if the half is +-inf.
    fn is_infinite(&self) -> bool {
        self.inner.is_infinite()
    }

    fn __float__(&self) -> f64 {
        self.inner.to_f64()
    }
    fn __eq__(&self, other: &PyHalf) -> bool {
        self.inner == other.inner
    }
    fn __hash__(&self) -> u64 {
        self.inner.to_bits() as u64
    }
    fn __repr__(&self) -> String {
        format!("Half({:?}, bits={:#06x})", self.inner.to_f64(), self.bits())
    }
}

/// Converts a binary16 bit pattern to a float.
///
/// Args:
///     bits: The raw binary16 bits (0..=0xFFFF)
#[pyfunction]
#[pyo3(name = "decode")]
fn py_decode(bits: u16) -> f32 {
    decode(bits)
}

/// Rounds a float to the nearest binary16 bit pattern.
///
/// The value passes through fp32 first, as in the native API.
///
/// Args:
///     value: The value to convert
#[pyfunction]
#[pyo3(name = "encode")]
fn py_encode(value: f32) -> u16 {
    encode(value)
}

#[pymodule]
fn _halfconv(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyHalf>()?;

    // Add the functions to the module
    m.add_function(wrap_pyfunction!(py_decode, m)?)?;
    m.add_function(wrap_pyfunction!(py_encode, m)?)?;
    Ok(())
}
