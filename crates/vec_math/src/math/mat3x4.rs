//! Affine 3x4 matrix
//!
//! The three stored rows are the top of a 4x4 matrix whose bottom row is
//! always `[0, 0, 0, 1]`. Composition helpers (`translate`, `scale`,
//! `rotate*`) post-multiply, so the last call is the first transform applied
//! to a point.

use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{
    check_length, columns, display, AffineParts, MathError, Quaternion, Vec3, PRECISION,
};

const IDENTITY: [f64; 12] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0,
];

/// Affine transform stored as 3 rows of 4 columns, row-major
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat3x4 {
    m: [f64; 12],
}

impl Default for Mat3x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat3x4 {
    /// Create a matrix from 12 row-major values
    pub const fn new(values: [f64; 12]) -> Self {
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
    pub const fn as_array(&self) -> &[f64; 12] {
        &self.m
    }

    /// Row-major values
    pub const fn to_array(self) -> [f64; 12] {
        self.m
    }

    /// Element at `row`, `col`; row 3 reads the implicit `[0, 0, 0, 1]`
    ///
    /// # Panics
    ///
    /// Panics if `row > 3` or `col > 3`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < 4 && col < 4, "Mat3x4 index ({row}, {col}) out of range");
        if row == 3 {
            return if col == 3 { 1.0 } else { 0.0 };
        }
        self.m[row * 4 + col]
    }

    /// Overwrite one stored element
    ///
    /// # Panics
    ///
    /// Panics if `row > 2` or `col > 3`; the fourth row is not stored.
    pub fn set_element(&mut self, row: usize, col: usize, value: f64) -> &mut Self {
        assert!(row < 3 && col < 4, "Mat3x4 element ({row}, {col}) is not stored");
        self.m[row * 4 + col] = value;
        self
    }

    /// Overwrite all 12 values
    pub fn set(&mut self, values: [f64; 12]) -> &mut Self {
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

    /// `self = self · other`
    pub fn mul(&mut self, other: &Self) -> &mut Self {
        let a = *self;
        self.assign_mul(&a, other)
    }

    /// `self = a · b`
    pub fn assign_mul(&mut self, a: &Self, b: &Self) -> &mut Self {
        let (a, b) = (&a.m, &b.m);
        let mut out = [0.0; 12];

        for row in 0..3 {
            let r = &a[row * 4..row * 4 + 4];
            for col in 0..4 {
                out[row * 4 + col] = r[0] * b[col] + r[1] * b[4 + col] + r[2] * b[8 + col];
            }
            out[row * 4 + 3] += r[3];
        }

        self.set(out)
    }

    /// Determinant of the linear block
    pub fn det(&self) -> f64 {
        let m = &self.m;
        m[0] * (m[5] * m[10] - m[6] * m[9]) - m[1] * (m[4] * m[10] - m[6] * m[8])
            + m[2] * (m[4] * m[9] - m[5] * m[8])
    }

    /// Transpose the linear block and clear the translation
    pub fn transpose(&mut self) -> &mut Self {
        let m = self.m;
        self.set([
            m[0], m[4], m[8], 0.0, //
            m[1], m[5], m[9], 0.0, //
            m[2], m[6], m[10], 0.0,
        ])
    }

    /// Invert in place
    ///
    /// A singular matrix yields non-finite values; use
    /// [`Mat3x4::try_invert`] when that can happen.
    pub fn invert(&mut self) -> &mut Self {
        let det = self.det();
        self.set(affine_inverse(&self.m, det))
    }

    /// Invert in place, refusing a singular matrix
    ///
    /// # Errors
    ///
    /// Returns [`MathError::Singular`] when `|det| < PRECISION`; the matrix
    /// is left unchanged.
    pub fn try_invert(&mut self) -> Result<&mut Self, MathError> {
        let determinant = self.det();
        if determinant.abs() < PRECISION {
            log::debug!("Refusing to invert singular Mat3x4 (det {determinant})");
            return Err(MathError::Singular { determinant });
        }
        Ok(self.set(affine_inverse(&self.m, determinant)))
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
        self.set_identity().set_translation(dx, dy, dz)
    }

    /// Overwrite with a pure scale
    pub fn set_scale(&mut self, sx: f64, sy: f64, sz: f64) -> &mut Self {
        self.set([
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, sz, 0.0,
        ])
    }

    /// Overwrite with a pure rotation of `theta` radians about `axis`
    pub fn set_rotate(&mut self, theta: f64, axis: &Vec3) -> &mut Self {
        let r = columns::axis_rotation(theta, columns::unit_axis(axis));
        self.set_identity();
        columns::write_linear(&mut self.m, &r);
        self
    }

    /// Overwrite with a pure rotation about X
    pub fn set_rotate_x(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        self.set([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, -s, 0.0, //
            0.0, s, c, 0.0,
        ])
    }

    /// Overwrite with a pure rotation about Y
    pub fn set_rotate_y(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        self.set([
            c, 0.0, s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -s, 0.0, c, 0.0,
        ])
    }

    /// Overwrite with a pure rotation about Z
    pub fn set_rotate_z(&mut self, theta: f64) -> &mut Self {
        let (s, c) = theta.sin_cos();
        self.set([
            c, -s, 0.0, 0.0, //
            s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0,
        ])
    }

    /// Replace only the translation column
    pub fn set_translation(&mut self, dx: f64, dy: f64, dz: f64) -> &mut Self {
        self.m[3] = dx;
        self.m[7] = dy;
        self.m[11] = dz;
        self
    }

    /// The translation column
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[3], self.m[7], self.m[11])
    }

    /// Per-axis scale (column lengths of the linear block)
    pub fn scaling(&self) -> Vec3 {
        let mut scale = Vec3::zero();
        scale.scale_of(self);
        scale
    }

    /// Split into translation, scale and rotation
    ///
    /// Assumes no shear. A zero scale axis leaves no rotation to recover, so
    /// the rotation is the identity in that case.
    pub fn decompose(&self) -> (Vec3, Vec3, Quaternion) {
        let translation = self.translation();
        let scale = self.scaling();

        if scale.x < PRECISION || scale.y < PRECISION || scale.z < PRECISION {
            log::debug!("Decomposing Mat3x4 with a collapsed axis, scale {scale}");
            return (translation, scale, Quaternion::identity());
        }

        // Remove scale from the rotation block
        let mut rotation = *self;
        rotation.scale(1.0 / scale.x, 1.0 / scale.y, 1.0 / scale.z);

        (translation, scale, Quaternion::from_matrix(&rotation))
    }

    /// Overwrite with a right-handed view transform
    ///
    /// The camera at `eye` looks toward `center` down its local -Z axis.
    /// When `eye == center` there is no direction to look along and the
    /// matrix becomes the identity.
    pub fn look_at(&mut self, eye: &Vec3, center: &Vec3, up: &Vec3) -> &mut Self {
        let mut forward = *eye;
        forward.sub(center);
        match view_rows(eye, &forward, up) {
            Some(rows) => self.set(rows),
            None => self.set_identity(),
        }
    }

    /// Overwrite with the rotation of a unit quaternion, clearing translation
    pub fn set_from_quaternion(&mut self, q: &Quaternion) -> &mut Self {
        let r = columns::quaternion_rotation(q.x, q.y, q.z, q.w);
        self.set_identity();
        columns::write_linear(&mut self.m, &r);
        self
    }

    /// Column-major 4x4 values for upload, with the implicit bottom row
    pub fn flatten(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        self.flatten_into(&mut out);
        out
    }

    /// Write the column-major 4x4 values into `out`
    pub fn flatten_into(&self, out: &mut [f64; 16]) {
        for (col, column) in out.chunks_exact_mut(4).enumerate() {
            for (row, value) in column.iter_mut().enumerate() {
                *value = self.get(row, col);
            }
        }
    }

    /// Column-major 4x4 values at single precision
    #[allow(clippy::cast_possible_truncation)]
    pub fn flatten_f32(&self) -> [f32; 16] {
        self.flatten().map(|value| value as f32)
    }
}

/// Rows of a view transform whose local +Z points along `forward`
///
/// Returns `None` when `forward` has no length.
#[allow(clippy::float_cmp)]
pub(crate) fn view_rows(eye: &Vec3, forward: &Vec3, up: &Vec3) -> Option<[f64; 12]> {
    if forward.squared_length() == 0.0 {
        log::debug!("look_at with eye at the target {eye}, using identity");
        return None;
    }

    let mut z = *forward;
    z.normalize();
    let mut x = Vec3::zero();
    x.assign_cross(up, &z).normalize();
    let mut y = Vec3::zero();
    y.assign_cross(&z, &x).normalize();

    Some([
        x.x, x.y, x.z, -x.dot(eye), //
        y.x, y.y, y.z, -y.dot(eye), //
        z.x, z.y, z.z, -z.dot(eye),
    ])
}

/// Affine inverse: cofactor inverse of the linear block and the
/// translation carried back through it. Every input is read before output
/// is produced.
fn affine_inverse(m: &[f64; 12], det: f64) -> [f64; 12] {
    let [m00, m01, m02, m03, m10, m11, m12, m13, m20, m21, m22, m23] = *m;

    let i00 = (m11 * m22 - m12 * m21) / det;
    let i01 = (m02 * m21 - m01 * m22) / det;
    let i02 = (m01 * m12 - m02 * m11) / det;
    let i10 = (m12 * m20 - m10 * m22) / det;
    let i11 = (m00 * m22 - m02 * m20) / det;
    let i12 = (m02 * m10 - m00 * m12) / det;
    let i20 = (m10 * m21 - m11 * m20) / det;
    let i21 = (m01 * m20 - m00 * m21) / det;
    let i22 = (m00 * m11 - m01 * m10) / det;

    [
        i00, i01, i02, -(i00 * m03 + i01 * m13 + i02 * m23),
        i10, i11, i12, -(i10 * m03 + i11 * m13 + i12 * m23),
        i20, i21, i22, -(i20 * m03 + i21 * m13 + i22 * m23),
    ]
}

impl AffineParts for Mat3x4 {
    fn linear(&self) -> [[f64; 3]; 3] {
        columns::read_linear(&self.m)
    }

    fn translation_column(&self) -> [f64; 3] {
        [self.m[3], self.m[7], self.m[11]]
    }
}

impl From<[f64; 12]> for Mat3x4 {
    fn from(values: [f64; 12]) -> Self {
        Self::new(values)
    }
}

impl TryFrom<&[f64]> for Mat3x4 {
    type Error = MathError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        check_length(values, 12)?;
        let mut m = [0.0; 12];
        m.copy_from_slice(values);
        Ok(Self::new(m))
    }
}

// SAFETY: repr(C) wrapper of [f64; 12], no padding, all-zero is valid
#[allow(unsafe_code)]
unsafe impl bytemuck::Zeroable for Mat3x4 {}
#[allow(unsafe_code)]
unsafe impl bytemuck::Pod for Mat3x4 {}

impl fmt::Display for Mat3x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::matrix(f, "M34", &self.m)
    }
}

impl AbsDiffEq for Mat3x4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        PRECISION
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m.iter().zip(other.m.iter()).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat3x4 {
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
