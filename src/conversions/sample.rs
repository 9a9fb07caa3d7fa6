use std::fmt;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Sub};

use num_complex::{Complex32, Complex64};
use num_traits::{Float, Zero};

use crate::error::ConfigError;

/// Element types a stream can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Complex number made of two 32-bit floats.
    Z64,
    /// Complex number made of two 64-bit floats.
    Z128,
}

impl ElementType {
    /// Bytes per sample.
    #[inline]
    pub fn unit_size(self) -> usize {
        match self {
            ElementType::F32 => 4,
            ElementType::F64 | ElementType::Z64 => 8,
            ElementType::Z128 => 16,
        }
    }

    /// The native-endian format name, e.g. `F64LE` on little-endian targets.
    pub fn format_name(self) -> &'static str {
        let little = cfg!(target_endian = "little");
        match (self, little) {
            (ElementType::F32, true) => "F32LE",
            (ElementType::F32, false) => "F32BE",
            (ElementType::F64, true) => "F64LE",
            (ElementType::F64, false) => "F64BE",
            (ElementType::Z64, true) => "Z64LE",
            (ElementType::Z64, false) => "Z64BE",
            (ElementType::Z128, true) => "Z128LE",
            (ElementType::Z128, false) => "Z128BE",
        }
    }

    /// Parses a format name such as `F32LE` or `Z128BE`.
    ///
    /// Only the native byte order is accepted; samples are processed in place and never swapped.
    pub fn from_format_name(name: &str) -> Result<Self, ConfigError> {
        [
            ElementType::F32,
            ElementType::F64,
            ElementType::Z64,
            ElementType::Z128,
        ]
        .into_iter()
        .find(|element_type| element_type.format_name() == name)
        .ok_or_else(|| ConfigError::UnsupportedFormat(name.to_owned()))
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::F32 => "F32",
            ElementType::F64 => "F64",
            ElementType::Z64 => "Z64",
            ElementType::Z128 => "Z128",
        };
        f.write_str(name)
    }
}

/// Represents the value of a single sample.
///
/// Implemented for `f32`, `f64`, [`Complex32`] and [`Complex64`]. Kernels do their arithmetic in
/// the precision of the element itself: a `f32` stream is interpolated with `f32` coefficients.
pub trait Sample:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Zero
    + Add<Output = Self>
    + Sub<Output = Self>
    + AddAssign
{
    /// Scalar type of the coefficients applied to this sample.
    type Real: Float + Debug + Send + Sync + 'static;

    /// The element type tag matching this Rust type.
    const ELEMENT_TYPE: ElementType;

    /// Converts a coefficient to the working precision.
    fn real(value: f64) -> Self::Real;

    /// Multiplies the sample by a real coefficient.
    fn scale(self, factor: Self::Real) -> Self;

    /// Divides the sample by a real coefficient.
    fn unscale(self, divisor: Self::Real) -> Self;
}

impl Sample for f32 {
    type Real = f32;
    const ELEMENT_TYPE: ElementType = ElementType::F32;

    #[inline]
    fn real(value: f64) -> f32 {
        value as f32
    }

    #[inline]
    fn scale(self, factor: f32) -> Self {
        self * factor
    }

    #[inline]
    fn unscale(self, divisor: f32) -> Self {
        self / divisor
    }
}

impl Sample for f64 {
    type Real = f64;
    const ELEMENT_TYPE: ElementType = ElementType::F64;

    #[inline]
    fn real(value: f64) -> f64 {
        value
    }

    #[inline]
    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    #[inline]
    fn unscale(self, divisor: f64) -> Self {
        self / divisor
    }
}

impl Sample for Complex32 {
    type Real = f32;
    const ELEMENT_TYPE: ElementType = ElementType::Z64;

    #[inline]
    fn real(value: f64) -> f32 {
        value as f32
    }

    #[inline]
    fn scale(self, factor: f32) -> Self {
        self * factor
    }

    #[inline]
    fn unscale(self, divisor: f32) -> Self {
        self / divisor
    }
}

impl Sample for Complex64 {
    type Real = f64;
    const ELEMENT_TYPE: ElementType = ElementType::Z128;

    #[inline]
    fn real(value: f64) -> f64 {
        value
    }

    #[inline]
    fn scale(self, factor: f64) -> Self {
        self * factor
    }

    #[inline]
    fn unscale(self, divisor: f64) -> Self {
        self / divisor
    }
}
