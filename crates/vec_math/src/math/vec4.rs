//! 4-component vector for homogeneous coordinates

use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{check_length, display, Mat3x4, Mat4x4, MathError, Vec3, PRECISION};

/// Homogeneous 4D vector
///
/// Points carry `w = 1` and directions `w = 0`. Matrix products never divide
/// by `w`; use [`Vec4::homogeneous_divide`] when a projected point is needed.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
    /// Homogeneous weight
    pub w: f64,
}

impl Vec4 {
    /// Create a vector from its components
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Extend a 3D vector with a weight
    pub const fn from_vec3(v: &Vec3, w: f64) -> Self {
        Self::new(v.x, v.y, v.z, w)
    }

    /// The first three components
    pub const fn xyz(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Components as `[x, y, z, w]`
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Overwrite all components
    pub fn set(&mut self, x: f64, y: f64, z: f64, w: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self.w = w;
        self
    }

    /// Copy the components of `v` into this vector
    pub fn copy_from(&mut self, v: &Self) -> &mut Self {
        *self = *v;
        self
    }

    /// Copy this vector into `target`
    pub fn copy_to(&self, target: &mut Self) -> &Self {
        *target = *self;
        self
    }

    /// Add `v` to this vector
    pub fn add(&mut self, v: &Self) -> &mut Self {
        self.x += v.x;
        self.y += v.y;
        self.z += v.z;
        self.w += v.w;
        self
    }

    /// Subtract `v` from this vector
    pub fn sub(&mut self, v: &Self) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self.z -= v.z;
        self.w -= v.w;
        self
    }

    /// Set this vector to `a + b`
    pub fn assign_add(&mut self, a: &Self, b: &Self) -> &mut Self {
        self.set(a.x + b.x, a.y + b.y, a.z + b.z, a.w + b.w)
    }

    /// Set this vector to `a - b`
    pub fn assign_sub(&mut self, a: &Self, b: &Self) -> &mut Self {
        self.set(a.x - b.x, a.y - b.y, a.z - b.z, a.w - b.w)
    }

    /// Add `s` to every component
    pub fn add_scalar(&mut self, s: f64) -> &mut Self {
        self.x += s;
        self.y += s;
        self.z += s;
        self.w += s;
        self
    }

    /// Subtract `s` from every component
    pub fn sub_scalar(&mut self, s: f64) -> &mut Self {
        self.add_scalar(-s)
    }

    /// Multiply every component by `s`
    pub fn mul_scalar(&mut self, s: f64) -> &mut Self {
        self.x *= s;
        self.y *= s;
        self.z *= s;
        self.w *= s;
        self
    }

    /// Divide every component by `s`
    pub fn div_scalar(&mut self, s: f64) -> &mut Self {
        self.x /= s;
        self.y /= s;
        self.z /= s;
        self.w /= s;
        self
    }

    /// Dot product over all four components
    pub fn dot(&self, v: &Self) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z + self.w * v.w
    }

    /// Move toward `target` by the fraction `t`
    pub fn lerp(&mut self, target: &Self, t: f64) -> &mut Self {
        let a = *self;
        self.assign_lerp(&a, target, t)
    }

    /// Set this vector to `a + t * (b - a)`
    pub fn assign_lerp(&mut self, a: &Self, b: &Self, t: f64) -> &mut Self {
        self.set(
            a.x + t * (b.x - a.x),
            a.y + t * (b.y - a.y),
            a.z + t * (b.z - a.z),
            a.w + t * (b.w - a.w),
        )
    }

    /// Transform by an affine matrix; the translation column is weighted by `w`
    pub fn mul_mat3x4(&mut self, m: &Mat3x4) -> &mut Self {
        let n = m.as_array();
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        self.set(
            n[0] * x + n[1] * y + n[2] * z + n[3] * w,
            n[4] * x + n[5] * y + n[6] * z + n[7] * w,
            n[8] * x + n[9] * y + n[10] * z + n[11] * w,
            w,
        )
    }

    /// Transform by a 4x4 matrix without a perspective divide
    pub fn mul_mat4x4(&mut self, m: &Mat4x4) -> &mut Self {
        let n = m.as_array();
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        self.set(
            n[0] * x + n[1] * y + n[2] * z + n[3] * w,
            n[4] * x + n[5] * y + n[6] * z + n[7] * w,
            n[8] * x + n[9] * y + n[10] * z + n[11] * w,
            n[12] * x + n[13] * y + n[14] * z + n[15] * w,
        )
    }

    /// Project back into 3-space by dividing `x`, `y`, `z` by `w`
    pub fn homogeneous_divide(&self) -> Vec3 {
        Vec3::new(self.x / self.w, self.y / self.w, self.z / self.w)
    }

    /// Scale this vector to unit length
    ///
    /// A zero vector stays zero.
    #[allow(clippy::float_cmp)]
    pub fn normalize(&mut self) -> &mut Self {
        let squared = self.squared_length();
        if squared == 1.0 {
            return self;
        }
        if squared == 0.0 {
            log::debug!("normalize of a zero-length Vec4, keeping zero vector");
            return self.set(0.0, 0.0, 0.0, 0.0);
        }
        self.div_scalar(squared.sqrt())
    }

    /// Euclidean length over all four components
    pub fn length(&self) -> f64 {
        self.squared_length().sqrt()
    }

    /// Squared euclidean length over all four components
    pub fn squared_length(&self) -> f64 {
        self.dot(self)
    }

    /// Distance to `v`
    pub fn distance(&self, v: &Self) -> f64 {
        self.squared_distance(v).sqrt()
    }

    /// Squared distance to `v`
    pub fn squared_distance(&self, v: &Self) -> f64 {
        let mut d = *self;
        d.sub(v).squared_length()
    }

    /// Whether the length is 1 within [`PRECISION`]
    pub fn is_unit(&self) -> bool {
        (self.squared_length() - 1.0).abs() < PRECISION
    }
}

// SAFETY: repr(C) struct of four f64 fields, no padding, all-zero is valid
#[allow(unsafe_code)]
unsafe impl bytemuck::Zeroable for Vec4 {}
#[allow(unsafe_code)]
unsafe impl bytemuck::Pod for Vec4 {}

impl From<[f64; 4]> for Vec4 {
    fn from([x, y, z, w]: [f64; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl From<Vec4> for [f64; 4] {
    fn from(v: Vec4) -> Self {
        v.to_array()
    }
}

impl TryFrom<&[f64]> for Vec4 {
    type Error = MathError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        check_length(values, 4)?;
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

impl fmt::Display for Vec4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::vector(f, "V4", &self.to_array())
    }
}

impl AbsDiffEq for Vec4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        PRECISION
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Vec4 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
