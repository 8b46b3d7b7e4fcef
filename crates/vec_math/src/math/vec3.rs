//! 3-component vector for points and directions

use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{check_length, display, AffineParts, Mat3x4, Mat4x4, MathError, Quaternion, PRECISION};

/// 3D vector
///
/// Arithmetic methods mutate the vector in place and return it, so calls
/// chain: `v.sub(&center).normalize().mul_scalar(radius)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Create a vector from its components
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Components as `[x, y, z]`
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Overwrite all components
    pub fn set(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self.z = z;
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
        self
    }

    /// Subtract `v` from this vector
    pub fn sub(&mut self, v: &Self) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self.z -= v.z;
        self
    }

    /// Set this vector to `a + b`
    pub fn assign_add(&mut self, a: &Self, b: &Self) -> &mut Self {
        self.set(a.x + b.x, a.y + b.y, a.z + b.z)
    }

    /// Set this vector to `a - b`
    pub fn assign_sub(&mut self, a: &Self, b: &Self) -> &mut Self {
        self.set(a.x - b.x, a.y - b.y, a.z - b.z)
    }

    /// Add `s` to every component
    pub fn add_scalar(&mut self, s: f64) -> &mut Self {
        self.x += s;
        self.y += s;
        self.z += s;
        self
    }

    /// Subtract `s` from every component
    pub fn sub_scalar(&mut self, s: f64) -> &mut Self {
        self.x -= s;
        self.y -= s;
        self.z -= s;
        self
    }

    /// Multiply every component by `s`
    pub fn mul_scalar(&mut self, s: f64) -> &mut Self {
        self.x *= s;
        self.y *= s;
        self.z *= s;
        self
    }

    /// Divide every component by `s`
    pub fn div_scalar(&mut self, s: f64) -> &mut Self {
        self.x /= s;
        self.y /= s;
        self.z /= s;
        self
    }

    /// Flip the direction of this vector
    pub fn negate(&mut self) -> &mut Self {
        self.mul_scalar(-1.0)
    }

    /// Set this vector to `self × v` (right-handed)
    pub fn cross(&mut self, v: &Self) -> &mut Self {
        let a = *self;
        self.assign_cross(&a, v)
    }

    /// Set this vector to `a × b` (right-handed)
    pub fn assign_cross(&mut self, a: &Self, b: &Self) -> &mut Self {
        self.set(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        )
    }

    /// Dot product with `v`
    pub fn dot(&self, v: &Self) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Move toward `target` by the fraction `t`
    pub fn lerp(&mut self, target: &Self, t: f64) -> &mut Self {
        self.x += t * (target.x - self.x);
        self.y += t * (target.y - self.y);
        self.z += t * (target.z - self.z);
        self
    }

    /// Set this vector to `a + t * (b - a)`
    pub fn assign_lerp(&mut self, a: &Self, b: &Self, t: f64) -> &mut Self {
        self.set(
            a.x + t * (b.x - a.x),
            a.y + t * (b.y - a.y),
            a.z + t * (b.z - a.z),
        )
    }

    /// Transform this point by an affine matrix
    pub fn mul_mat3x4(&mut self, m: &Mat3x4) -> &mut Self {
        let n = m.as_array();
        let (x, y, z) = (self.x, self.y, self.z);
        self.set(
            n[0] * x + n[1] * y + n[2] * z + n[3],
            n[4] * x + n[5] * y + n[6] * z + n[7],
            n[8] * x + n[9] * y + n[10] * z + n[11],
        )
    }

    /// Transform this point by a 4x4 matrix, dividing by the resulting `w`
    ///
    /// A point that lands on `w == 0` produces non-finite components.
    pub fn mul_mat4x4(&mut self, m: &Mat4x4) -> &mut Self {
        let n = m.as_array();
        let (x, y, z) = (self.x, self.y, self.z);
        let w = 1.0 / (n[12] * x + n[13] * y + n[14] * z + n[15]);
        self.set(
            (n[0] * x + n[1] * y + n[2] * z + n[3]) * w,
            (n[4] * x + n[5] * y + n[6] * z + n[7]) * w,
            (n[8] * x + n[9] * y + n[10] * z + n[11]) * w,
        )
    }

    /// Rotate this vector by a unit quaternion (`q * v * q⁻¹`)
    pub fn mul_quaternion(&mut self, q: &Quaternion) -> &mut Self {
        // t = 2 (q.xyz × v), v' = v + w t + q.xyz × t
        let tx = 2.0 * (q.y * self.z - q.z * self.y);
        let ty = 2.0 * (q.z * self.x - q.x * self.z);
        let tz = 2.0 * (q.x * self.y - q.y * self.x);

        self.x += q.w * tx + (q.y * tz - q.z * ty);
        self.y += q.w * ty + (q.z * tx - q.x * tz);
        self.z += q.w * tz + (q.x * ty - q.y * tx);
        self
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
            log::debug!("normalize of a zero-length Vec3, keeping zero vector");
            return self.set(0.0, 0.0, 0.0);
        }
        self.div_scalar(squared.sqrt())
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        self.squared_length().sqrt()
    }

    /// Squared euclidean length
    pub fn squared_length(&self) -> f64 {
        self.dot(self)
    }

    /// Distance to the point `v`
    pub fn distance(&self, v: &Self) -> f64 {
        self.squared_distance(v).sqrt()
    }

    /// Squared distance to the point `v`
    pub fn squared_distance(&self, v: &Self) -> f64 {
        let (dx, dy, dz) = (self.x - v.x, self.y - v.y, self.z - v.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Whether the length is 1 within [`PRECISION`]
    pub fn is_unit(&self) -> bool {
        (self.squared_length() - 1.0).abs() < PRECISION
    }

    /// Load the translation column of a matrix
    pub fn translation_of<M: AffineParts>(&mut self, m: &M) -> &mut Self {
        let [x, y, z] = m.translation_column();
        self.set(x, y, z)
    }

    /// Load the per-axis scale of a matrix (lengths of its linear columns)
    pub fn scale_of<M: AffineParts>(&mut self, m: &M) -> &mut Self {
        let l = m.linear();
        let column = |j: usize| (l[0][j] * l[0][j] + l[1][j] * l[1][j] + l[2][j] * l[2][j]).sqrt();
        self.set(column(0), column(1), column(2))
    }
}

// SAFETY: repr(C) struct of three f64 fields, no padding, all-zero is valid
#[allow(unsafe_code)]
unsafe impl bytemuck::Zeroable for Vec3 {}
#[allow(unsafe_code)]
unsafe impl bytemuck::Pod for Vec3 {}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl TryFrom<&[f64]> for Vec3 {
    type Error = MathError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        check_length(values, 3)?;
        Ok(Self::new(values[0], values[1], values[2]))
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::vector(f, "V3", &self.to_array())
    }
}

impl AbsDiffEq for Vec3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        PRECISION
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vec3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_arithmetic_chains() {
        let mut v = Vec3::new(10.0, 20.0, 30.0);
        v.add(&Vec3::new(1.0, 2.0, 3.0))
            .sub_scalar(1.0)
            .mul_scalar(2.0)
            .div_scalar(4.0);

        assert_eq!(v, Vec3::new(5.0, 10.5, 16.0));

        let mut w = Vec3::zero();
        w.assign_sub(&Vec3::new(5.0, 5.0, 5.0), &Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(w, Vec3::new(4.0, 3.0, 2.0));

        w.assign_add(&Vec3::new(1.0, 1.0, 1.0), &Vec3::new(1.0, 2.0, 3.0))
            .add_scalar(1.0)
            .sub(&Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(w, Vec3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn test_copy_does_not_alias() {
        let source = Vec3::new(1.0, 2.0, 3.0);
        let mut target = Vec3::zero();
        source.copy_to(&mut target);
        target.negate();

        assert_eq!(source, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(target, Vec3::new(-1.0, -2.0, -3.0));

        target.copy_from(&source);
        assert_eq!(target, source);
    }

    #[test]
    fn test_cross_is_right_handed() {
        let mut x = Vec3::new(1.0, 0.0, 0.0);
        x.cross(&Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(x, Vec3::new(0.0, 0.0, 1.0));

        let mut v = Vec3::new(1.0, 2.0, 3.0);
        v.cross(&Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(v, Vec3::new(-4.0, 8.0, -4.0));

        let mut assigned = Vec3::zero();
        assigned.assign_cross(&Vec3::new(1.0, 2.0, 3.0), &Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(assigned, v);
    }

    #[test]
    fn test_dot_and_distance() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(a.dot(&Vec3::new(3.0, 2.0, 1.0)), 10.0);

        let p = Vec3::new(10.0, 11.0, 12.0);
        let q = Vec3::new(20.0, 21.0, 22.0);
        assert_eq!(p.squared_distance(&q), 300.0);
        assert_eq!(p.distance(&q), 300.0_f64.sqrt());
    }

    #[test]
    fn test_lerp() {
        let mut v = Vec3::new(10.0, 100.0, 1000.0);
        v.lerp(&Vec3::new(20.0, 200.0, 2000.0), 0.5);
        assert_eq!(v, Vec3::new(15.0, 150.0, 1500.0));

        let mut assigned = Vec3::new(99.0, 99.0, 99.0);
        assigned.assign_lerp(
            &Vec3::new(10.0, 100.0, 1000.0),
            &Vec3::new(20.0, 200.0, 2000.0),
            0.25,
        );
        assert_eq!(assigned, Vec3::new(12.5, 125.0, 1250.0));
    }

    #[test]
    fn test_length_and_normalize() {
        assert_eq!(Vec3::zero().length(), 0.0);
        assert_eq!(Vec3::new(10.0, 0.0, 0.0).length(), 10.0);
        assert_eq!(Vec3::new(10.0, 10.0, 10.0).squared_length(), 300.0);

        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert!(!v.is_unit());
        v.normalize();
        assert!(v.is_unit());
        assert_relative_eq!(v.length(), 1.0, epsilon = PRECISION);

        let before = v;
        v.normalize();
        assert_abs_diff_eq!(v, before);
    }

    #[test]
    fn test_normalize_zero_vector_stays_zero() {
        crate::foundation::logging::init_for_tests();

        let mut v = Vec3::zero();
        v.normalize();
        assert_eq!(v, Vec3::zero());
    }

    #[test]
    fn test_mul_mat3x4() {
        let m = Mat3x4::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        v.mul_mat3x4(&m);
        assert_eq!(v, Vec3::new(18.0, 46.0, 74.0));
    }

    #[test]
    fn test_mul_mat4x4_divides_by_w() {
        let m = Mat4x4::new([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 1.0, 1.0,
        ]);
        let mut v = Vec3::new(2.0, 4.0, 3.0);
        v.mul_mat4x4(&m);
        assert_abs_diff_eq!(v, Vec3::new(0.5, 1.0, 0.75));
    }

    #[test]
    fn test_mul_mat4x4_projects_near_and_far_planes() {
        let mut projection = Mat4x4::identity();
        projection.perspective(60.0, 1.5, 1.0, 100.0);

        let mut near = Vec3::new(0.0, 0.0, -1.0);
        near.mul_mat4x4(&projection);
        assert_abs_diff_eq!(near, Vec3::new(0.0, 0.0, -1.0));

        let mut far = Vec3::new(0.0, 0.0, -100.0);
        far.mul_mat4x4(&projection);
        assert_abs_diff_eq!(far, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_mul_quaternion_rotates_about_x() {
        let q = Quaternion::from_euler(90.0_f64.to_radians(), 0.0, 0.0);

        let mut v = Vec3::new(1.0, 2.0, 3.0);
        v.mul_quaternion(&q);
        assert_abs_diff_eq!(v, Vec3::new(1.0, -3.0, 2.0));
    }

    #[test]
    fn test_mul_quaternion_matches_rotation_matrix() {
        let q = Quaternion::from_axis_angle(&Vec3::new(0.0, 0.6, 0.8), 1.1);
        let m = Mat3x4::from_quaternion(&q);

        let mut by_quaternion = Vec3::new(-2.0, 0.5, 4.0);
        let mut by_matrix = by_quaternion;
        by_quaternion.mul_quaternion(&q);
        by_matrix.mul_mat3x4(&m);

        assert_abs_diff_eq!(by_quaternion, by_matrix, epsilon = 1e-12);
    }

    #[test]
    fn test_translation_and_scale_of_matrix() {
        let m = Mat3x4::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let mut t = Vec3::zero();
        t.translation_of(&m);
        assert_eq!(t, Vec3::new(4.0, 8.0, 12.0));

        let mut scaled = Mat3x4::identity();
        scaled.rotate_z(0.7).scale(2.0, 3.0, 4.0);
        let mut s = Vec3::zero();
        s.scale_of(&scaled);
        assert_abs_diff_eq!(s, Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_slice_conversion_checks_length() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(Vec3::try_from(&values[..]), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(
            Vec3::try_from(&values[..2]),
            Err(MathError::WrongLength { expected: 3, actual: 2 })
        );
        assert_eq!(<[f64; 3]>::from(Vec3::from(values)), values);
    }

    #[test]
    fn test_vertices_cast_to_flat_scalars() {
        let vertices = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        let flat: &[f64] = bytemuck::cast_slice(&vertices);
        assert_eq!(flat, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Vec3::new(1.0, 2.0, 3.0).to_string(), "V3[1, 2, 3]");
        assert_eq!(Vec3::new(0.5, -1.25, 1.0 / 3.0).to_string(), "V3[0.5, -1.25, 0.333333]");
    }
}
