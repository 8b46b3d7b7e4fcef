//! General 4x4 matrix with view and projection builders
//!
//! Stored row-major like [`Mat3x4`]; `flatten` produces the column-major
//! layout graphics APIs expect. Projection builders follow the OpenGL
//! conventions: right-handed eye space looking down -Z, clip depth in
//! `[-1, 1]`.

use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::mat3x4::view_rows;
use super::{
    check_length, columns, display, AffineParts, Mat3x4, MathError, Quaternion, Vec3, PRECISION,
};

const IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// 4x4 transform stored row-major
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat4x4 {
    m: [f64; 16],
}

impl Default for Mat4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4x4 {
    /// Create a matrix from 16 row-major values
    pub const fn new(values: [f64; 16]) -> Self {
        Self { m: values }
    }

    /// The identity transform
    pub const fn identity() -> Self {
        Self::new(IDENTITY)
    }

    /// Pure rotation from a unit quaternion
    pub fn from_quaternion(q: &Quaternion) -> Self {
        let mut m = Self::identity();
        m.set_from_quaternion(q);
        m
    }

    /// Row-major storage
    pub const fn as_array(&self) -> &[f64; 16] {
        &self.m
    }

    /// Row-major values
    pub const fn to_array(self) -> [f64; 16] {
        self.m
    }

    /// Element at `row`, `col`
    ///
    /// # Panics
    ///
    /// Panics if `row > 3` or `col > 3`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < 4 && col < 4, "Mat4x4 index ({row}, {col}) out of range");
        self.m[row * 4 + col]
    }

    /// Overwrite one element
    ///
    /// # Panics
    ///
    /// Panics if `row > 3` or `col > 3`.
    pub fn set_element(&mut self, row: usize, col: usize, value: f64) -> &mut Self {
        assert!(row < 4 && col < 4, "Mat4x4 index ({row}, {col}) out of range");
        self.m[row * 4 + col] = value;
        self
    }

    /// Overwrite all 16 values
    pub fn set(&mut self, values: [f64; 16]) -> &mut Self {
        self.m = values;
        self
    }

    /// Reset to the identity transform
    pub fn set_identity(&mut self) -> &mut Self {
        self.set(IDENTITY)
    }

    /// Copy the values of `other` into this matrix
    pub fn copy_from(&mut self, other: &Self) -> &mut Self {
        *self = *other;
        self
    }

    /// Copy this matrix into `target`
    pub fn copy_to(&self, target: &mut Self) -> &Self {
        *target = *self;
        self
    }

    /// The top three rows as an affine matrix, dropping the fourth row
    pub fn to_affine(&self) -> Mat3x4 {
        let mut top = [0.0; 12];
        top.copy_from_slice(&self.m[..12]);
        Mat3x4::new(top)
    }

    /// `self = self · other`
    pub fn mul(&mut self, other: &Self) -> &mut Self {
        let a = *self;
        self.assign_mul(&a, other)
    }

    /// `self = a · b`
    pub fn assign_mul(&mut self, a: &Self, b: &Self) -> &mut Self {
        let (a, b) = (&a.m, &b.m);
        let mut out = [0.0; 16];

        for (row, out_row) in out.chunks_exact_mut(4).enumerate() {
            let r = &a[row * 4..row * 4 + 4];
            for (col, value) in out_row.iter_mut().enumerate() {
                *value = r[0] * b[col] + r[1] * b[4 + col] + r[2] * b[8 + col] + r[3] * b[12 + col];
            }
        }

        self.set(out)
    }

    /// Full 4x4 determinant
    pub fn det(&self) -> f64 {
        Minors::of(&self.m).det()
    }

    /// Transpose in place
    pub fn transpose(&mut self) -> &mut Self {
        let m = self.m;
        self.set([
            m[0], m[4], m[8], m[12], //
            m[1], m[5], m[9], m[13], //
            m[2], m[6], m[10], m[14], //
            m[3], m[7], m[11], m[15],
        ])
    }

    /// Invert in place
    ///
    /// A singular matrix yields non-finite values; use
    /// [`Mat4x4::try_invert`] when that can happen.
    pub fn invert(&mut self) -> &mut Self {
        let minors = Minors::of(&self.m);
        self.set(minors.inverse(&self.m, minors.det()))
    }

    /// Invert in place, refusing a singular matrix
    ///
    /// # Errors
    ///
    /// Returns [`MathError::Singular`] when `|det| < PRECISION`; the matrix
    /// is left unchanged.
    pub fn try_invert(&mut self) -> Result<&mut Self, MathError> {
        let minors = Minors::of(&self.m);
        let determinant = minors.det();
        if determinant.abs() < PRECISION {
            log::debug!("Refusing to invert singular Mat4x4 (det {determinant})");
            return Err(MathError::Singular { determinant });
        }
        Ok(self.set(minors.inverse(&self.m, determinant)))
    }

    /// Post-multiply by a translation
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        columns::translate(&mut self.m, dx, dy, dz);
        self
    }

    /// Post-multiply by a scale
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        columns::scale(&mut self.m, sx, sy, sz);
        self
    }

    /// Post-multiply by a rotation of `theta` radians about `axis`
    pub fn rotate(&mut self, theta: f64, axis: &Vec3) -> &mut Self {
        let r = columns::axis_rotation(theta, columns::unit_axis(axis));
        columns::post_multiply_linear(&mut self.m, &r);
        self
    }

    /// Post-multiply by a rotation about X
    pub fn rotate_x(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        columns::rotate_plane(&mut self.m, 1, 2, c, s);
        self
    }

    /// Post-multiply by a rotation about Y
    pub fn rotate_y(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        columns::rotate_plane(&mut self.m, 2, 0, c, s);
        self
    }

    /// Post-multiply by a rotation about Z
    pub fn rotate_z(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        columns::rotate_plane(&mut self.m, 0, 1, c, s);
        self
    }

    /// Overwrite with a pure translation
    pub fn set_translate(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        self.set_identity();
        self.m[3] = dx;
        self.m[7] = dy;
        self.m[11] = dz;
        self
    }

    /// Overwrite with a pure scale
    pub fn set_scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        self.set_identity();
        self.m[0] = sx;
        self.m[5] = sy;
        self.m[10] = sz;
        self
    }

    /// Overwrite with a pure rotation of `theta` radians about `axis`
    pub fn set_rotate(&mut self, theta: f64, axis: &Vec3) -> &mut Self {
        self.set_identity().rotate(theta, axis)
    }

    /// Overwrite with a pure rotation about X
    pub fn set_rotate_x(&mut self, theta: f64) -> &mut Self {
        self.set_identity().rotate_x(theta)
    }

    /// Overwrite with a pure rotation about Y
    pub fn set_rotate_y(&mut self, theta: f64) -> &mut Self {
        self.set_identity().rotate_y(theta)
    }

    /// Overwrite with a pure rotation about Z
    pub fn set_rotate_z(&mut self, theta: f64) -> &mut Self {
        self.set_identity().rotate_z(theta)
    }

    /// Overwrite with the rotation of a unit quaternion
    pub fn set_from_quaternion(&mut self, q: &Quaternion) -> &mut Self {
        let r = columns::quaternion_rotation(q.x, q.y, q.z, q.w);
        self.set_identity();
        columns::write_linear(&mut self.m, &r);
        self
    }

    /// Right-handed view transform, same as [`Mat4x4::look_at_rh`]
    pub fn look_at(&mut self, eye: &Vec3, center: &Vec3, up: &Vec3) -> &mut Self {
        self.look_at_rh(eye, center, up)
    }

    /// Overwrite with a right-handed view transform: the target ends up on
    /// the -Z axis
    ///
    /// `eye == center` gives the identity.
    pub fn look_at_rh(&mut self, eye: &Vec3, center: &Vec3, up: &Vec3) -> &mut Self {
        let mut forward = *eye;
        forward.sub(center);
        self.set_view(eye, &forward, up)
    }

    /// Overwrite with a left-handed view transform: the target ends up on
    /// the +Z axis
    ///
    /// `eye == center` gives the identity.
    pub fn look_at_lh(&mut self, eye: &Vec3, center: &Vec3, up: &Vec3) -> &mut Self {
        let mut forward = *center;
        forward.sub(eye);
        self.set_view(eye, &forward, up)
    }

    fn set_view(&mut self, eye: &Vec3, forward: &Vec3, up: &Vec3) -> &mut Self {
        self.set_identity();
        if let Some(rows) = view_rows(eye, forward, up) {
            self.m[..12].copy_from_slice(&rows);
        }
        self
    }

    /// Overwrite with a perspective projection of the given frustum
    ///
    /// `left`..`top` are measured on the near plane; `near` and `far` are
    /// positive distances.
    pub fn frustum(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> &mut Self {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        self.set([
            2.0 * near / width, 0.0, (right + left) / width, 0.0, //
            0.0, 2.0 * near / height, (top + bottom) / height, 0.0, //
            0.0, 0.0, -(far + near) / depth, -2.0 * far * near / depth, //
            0.0, 0.0, -1.0, 0.0,
        ])
    }

    /// Overwrite with a symmetric perspective projection
    ///
    /// `fov_y` is the full vertical field of view in degrees.
    pub fn perspective(&mut self, fov_y: f64, aspect: f64, near: f64, far: f64) -> &mut Self {
        let y_max = near * (fov_y.to_radians() * 0.5).tan();
        let x_max = y_max * aspect;
        self.frustum(-x_max, x_max, -y_max, y_max, near, far)
    }

    /// Overwrite with an orthographic projection
    pub fn orthogonal(
        &mut self,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    ) -> &mut Self {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        self.set([
            2.0 / width, 0.0, 0.0, -(right + left) / width, //
            0.0, 2.0 / height, 0.0, -(top + bottom) / height, //
            0.0, 0.0, -2.0 / depth, -(far + near) / depth, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Column-major values for upload
    pub fn flatten(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        self.flatten_into(&mut out);
        out
    }

    /// Write the column-major values into `out`
    pub fn flatten_into(&self, out: &mut [f64; 16]) {
        for (col, column) in out.chunks_exact_mut(4).enumerate() {
            for (row, value) in column.iter_mut().enumerate() {
                *value = self.m[row * 4 + col];
            }
        }
    }

    /// Column-major values at single precision
    #[allow(clippy::cast_possible_truncation)]
    pub fn flatten_f32(&self) -> [f32; 16] {
        self.flatten().map(|value| value as f32)
    }
}

/// The twelve 2x2 minors of the top and bottom row pairs
///
/// Determinant and adjugate are both expanded from these.
struct Minors {
    b: [f64; 12],
}

impl Minors {
    fn of(m: &[f64; 16]) -> Self {
        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] = *m;
        Self {
            b: [
                a00 * a11 - a01 * a10,
                a00 * a12 - a02 * a10,
                a00 * a13 - a03 * a10,
                a01 * a12 - a02 * a11,
                a01 * a13 - a03 * a11,
                a02 * a13 - a03 * a12,
                a20 * a31 - a21 * a30,
                a20 * a32 - a22 * a30,
                a20 * a33 - a23 * a30,
                a21 * a32 - a22 * a31,
                a21 * a33 - a23 * a31,
                a22 * a33 - a23 * a32,
            ],
        }
    }

    fn det(&self) -> f64 {
        let [b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11] = self.b;
        b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06
    }

    fn inverse(&self, m: &[f64; 16], det: f64) -> [f64; 16] {
        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] = *m;
        let [b00, b01, b02, b03, b04, b05, b06, b07, b08, b09, b10, b11] = self.b;

        [
            a11 * b11 - a12 * b10 + a13 * b09,
            a02 * b10 - a01 * b11 - a03 * b09,
            a31 * b05 - a32 * b04 + a33 * b03,
            a22 * b04 - a21 * b05 - a23 * b03,
            a12 * b08 - a10 * b11 - a13 * b07,
            a00 * b11 - a02 * b08 + a03 * b07,
            a32 * b02 - a30 * b05 - a33 * b01,
            a20 * b05 - a22 * b02 + a23 * b01,
            a10 * b10 - a11 * b08 + a13 * b06,
            a01 * b08 - a00 * b10 - a03 * b06,
            a30 * b04 - a31 * b02 + a33 * b00,
            a21 * b02 - a20 * b04 - a23 * b00,
            a11 * b07 - a10 * b09 - a12 * b06,
            a00 * b09 - a01 * b07 + a02 * b06,
            a31 * b01 - a30 * b03 - a32 * b00,
            a20 * b03 - a21 * b01 + a22 * b00,
        ]
        .map(|value| value / det)
    }
}

impl AffineParts for Mat4x4 {
    fn linear(&self) -> [[f64; 3]; 3] {
        columns::read_linear(&self.m)
    }

    fn translation_column(&self) -> [f64; 3] {
        [self.m[3], self.m[7], self.m[11]]
    }
}

impl From<Mat3x4> for Mat4x4 {
    fn from(affine: Mat3x4) -> Self {
        let mut m = IDENTITY;
        m[..12].copy_from_slice(affine.as_array());
        Self::new(m)
    }
}

impl From<[f64; 16]> for Mat4x4 {
    fn from(values: [f64; 16]) -> Self {
        Self::new(values)
    }
}

impl TryFrom<&[f64]> for Mat4x4 {
    type Error = MathError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        check_length(values, 16)?;
        let mut m = [0.0; 16];
        m.copy_from_slice(values);
        Ok(Self::new(m))
    }
}

// SAFETY: repr(C) wrapper of [f64; 16], no padding, all-zero is valid
#[allow(unsafe_code)]
unsafe impl bytemuck::Zeroable for Mat4x4 {}
#[allow(unsafe_code)]
unsafe impl bytemuck::Pod for Mat4x4 {}

impl fmt::Display for Mat4x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::matrix(f, "M44", &self.m)
    }
}

impl AbsDiffEq for Mat4x4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        PRECISION
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m.iter().zip(other.m.iter()).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4x4 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
