//! Rotation quaternion with matrix/Euler conversion and spline interpolation
//!
//! Components are stored as `(x, y, z, w)` with `w` the scalar part.
//! `a.mul(&b)` leaves the Hamilton product `b ⊗ a` in `a`, so the result
//! applies `a` first and then `b` when rotating a vector. Use
//! [`Quaternion::assign_mul`] for an explicit `a ⊗ b`.

use std::fmt;

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use super::{check_length, display, AffineParts, MathError, Vec3, PRECISION};

/// Below this, `1 - |cos θ|` is treated as parallel and slerp blends linearly
const SLERP_LINEAR_THRESHOLD: f64 = 0.01;

/// Quaternion `x i + y j + z k + w`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// I component
    pub x: f64,
    /// J component
    pub y: f64,
    /// K component
    pub z: f64,
    /// Scalar part
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Create a quaternion from raw components
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// The identity rotation `(0, 0, 0, 1)`
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// The zero quaternion, which is not a rotation
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians about `axis`
    ///
    /// The axis does not need to be normalized.
    pub fn from_axis_angle(axis: &Vec3, angle: f64) -> Self {
        let mut axis = *axis;
        axis.normalize();
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Rotation from angles about X, Y and Z (radians)
    pub fn from_euler(ax: f64, ay: f64, az: f64) -> Self {
        let mut q = Self::identity();
        q.set_from_euler(ax, ay, az);
        q
    }

    /// Rotation held by the linear block of a matrix
    pub fn from_matrix<M: AffineParts>(m: &M) -> Self {
        let mut q = Self::identity();
        q.set_from_matrix(m);
        q
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

    /// Reset to the identity rotation
    pub fn set_identity(&mut self) -> &mut Self {
        self.set(0.0, 0.0, 0.0, 1.0)
    }

    /// Copy the components of `q` into this quaternion
    pub fn copy_from(&mut self, q: &Self) -> &mut Self {
        *self = *q;
        self
    }

    /// Copy this quaternion into `target`
    pub fn copy_to(&self, target: &mut Self) -> &Self {
        *target = *self;
        self
    }

    /// Overwrite with the rotation held by the linear block of `m`
    ///
    /// The block must be a proper rotation; anything else gives a
    /// meaningless result. The diagonal decides which component is
    /// recovered from the square root so the divisor stays large.
    pub fn set_from_matrix<M: AffineParts>(&mut self, m: &M) -> &mut Self {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = m.linear();
        let d = m00 + m11 + m22 + 1.0;

        if d > 0.0 {
            let s = 2.0 * d.sqrt();
            self.set((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s);
        } else if m00 > m11 && m00 > m22 {
            let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
            self.set(0.25 * s, (m01 + m10) / s, (m20 + m02) / s, (m21 - m12) / s);
        } else if m11 > m22 {
            let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
            self.set((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s);
        } else {
            let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
            self.set((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s);
        }

        self.normalize()
    }

    /// Overwrite with the rotation about X by `ax`, then Y by `ay`, then Z
    /// by `az` (radians)
    pub fn set_from_euler(&mut self, ax: f64, ay: f64, az: f64) -> &mut Self {
        let (sr, cr) = (ax * 0.5).sin_cos();
        let (sp, cp) = (ay * 0.5).sin_cos();
        let (sy, cy) = (az * 0.5).sin_cos();

        self.set(
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            cr * cp * cy + sr * sp * sy,
        )
        .normalize()
    }

    /// Componentwise sum
    pub fn add(&mut self, q: &Self) -> &mut Self {
        self.x += q.x;
        self.y += q.y;
        self.z += q.z;
        self.w += q.w;
        self
    }

    /// Componentwise difference
    pub fn sub(&mut self, q: &Self) -> &mut Self {
        self.x -= q.x;
        self.y -= q.y;
        self.z -= q.z;
        self.w -= q.w;
        self
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

    /// Compose with `q`: `self = q ⊗ self`
    ///
    /// The rotation `self` is applied first, then `q`.
    pub fn mul(&mut self, q: &Self) -> &mut Self {
        let b = *self;
        self.assign_mul(q, &b)
    }

    /// Hamilton product `self = a ⊗ b`
    pub fn assign_mul(&mut self, a: &Self, b: &Self) -> &mut Self {
        self.set(
            a.x * b.w + a.w * b.x + a.y * b.z - a.z * b.y,
            a.y * b.w + a.w * b.y + a.z * b.x - a.x * b.z,
            a.z * b.w + a.w * b.z + a.x * b.y - a.y * b.x,
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        )
    }

    /// Four-component dot product
    pub fn dot(&self, q: &Self) -> f64 {
        self.x * q.x + self.y * q.y + self.z * q.z + self.w * q.w
    }

    /// Negate the vector part
    pub fn conjugate(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self
    }

    /// Multiplicative inverse (conjugate over squared length)
    ///
    /// The zero quaternion has no inverse and stays zero.
    pub fn invert(&mut self) -> &mut Self {
        let squared = self.squared_length();
        if squared < f64::EPSILON {
            log::debug!("invert of a zero-length quaternion, keeping zero");
            return self.set(0.0, 0.0, 0.0, 0.0);
        }
        self.conjugate().div_scalar(squared)
    }

    /// Rotation about Z
    ///
    /// With `reproject_axis` the local X axis is projected onto the XY plane
    /// before measuring; otherwise the shortest-path decomposition is used.
    pub fn roll(&self, reproject_axis: bool) -> f64 {
        let Self { x, y, z, w } = *self;
        if reproject_axis {
            (2.0 * x * y + 2.0 * z * w).atan2(1.0 - (2.0 * y * y + 2.0 * z * z))
        } else {
            (2.0 * (x * y + w * z)).atan2(w * w + x * x - y * y - z * z)
        }
    }

    /// Rotation about X
    pub fn pitch(&self, reproject_axis: bool) -> f64 {
        let Self { x, y, z, w } = *self;
        if reproject_axis {
            (2.0 * z * y + 2.0 * x * w).atan2(1.0 - (2.0 * x * x + 2.0 * z * z))
        } else {
            (2.0 * (y * z + w * x)).atan2(w * w - x * x - y * y + z * z)
        }
    }

    /// Rotation about Y
    pub fn yaw(&self, reproject_axis: bool) -> f64 {
        let Self { x, y, z, w } = *self;
        if reproject_axis {
            (2.0 * z * x + 2.0 * y * w).atan2(1.0 - (2.0 * x * x + 2.0 * y * y))
        } else {
            (-2.0 * (x * z - w * y)).clamp(-1.0, 1.0).asin()
        }
    }

    /// Interpolate from this quaternion toward `target`
    pub fn slerp(&mut self, target: &Self, t: f64, shortest_path: bool) -> &mut Self {
        let a = *self;
        self.assign_slerp(&a, target, t, shortest_path)
    }

    /// Spherical linear interpolation `self = slerp(a, b, t)`
    ///
    /// With `shortest_path`, `b` is negated when that puts it on the same
    /// hemisphere as `a`. Nearly parallel operands blend linearly.
    pub fn assign_slerp(&mut self, a: &Self, b: &Self, t: f64, shortest_path: bool) -> &mut Self {
        let mut b = *b;
        let mut cos_angle = a.dot(&b);
        if shortest_path && cos_angle < 0.0 {
            b.mul_scalar(-1.0);
            cos_angle = -cos_angle;
        }

        let (c1, c2) = if 1.0 - cos_angle.abs() < SLERP_LINEAR_THRESHOLD {
            (1.0 - t, t)
        } else {
            let angle = cos_angle.acos();
            let sin_angle = angle.sin();
            (((1.0 - t) * angle).sin() / sin_angle, (t * angle).sin() / sin_angle)
        };

        self.set(
            c1 * a.x + c2 * b.x,
            c1 * a.y + c2 * b.y,
            c1 * a.z + c2 * b.z,
            c1 * a.w + c2 * b.w,
        )
    }

    /// Spline interpolation from this quaternion toward `b`
    pub fn squad(&mut self, tangent_a: &Self, tangent_b: &Self, b: &Self, t: f64) -> &mut Self {
        let a = *self;
        self.assign_squad(&a, tangent_a, tangent_b, b, t)
    }

    /// Spherical quadrangle interpolation between `a` and `b` with the
    /// tangents from [`Quaternion::squad_tangent`]
    pub fn assign_squad(
        &mut self,
        a: &Self,
        tangent_a: &Self,
        tangent_b: &Self,
        b: &Self,
        t: f64,
    ) -> &mut Self {
        let mut ends = Self::zero();
        ends.assign_slerp(a, b, t, true);
        let mut tangents = Self::zero();
        tangents.assign_slerp(tangent_a, tangent_b, t, false);

        self.assign_slerp(&ends, &tangents, 2.0 * t * (1.0 - t), false)
    }

    /// Replace this quaternion (the spline point) with its tangent
    pub fn squad_tangent(&mut self, before: &Self, after: &Self) -> &mut Self {
        let center = *self;
        self.assign_squad_tangent(before, &center, after)
    }

    /// Spline tangent at `center`:
    /// `center ⊗ exp(-¼ (log(center⁻¹ ⊗ after) + log(center⁻¹ ⊗ before)))`
    pub fn assign_squad_tangent(
        &mut self,
        before: &Self,
        center: &Self,
        after: &Self,
    ) -> &mut Self {
        let mut inverse = *center;
        inverse.invert();

        let mut to_after = Self::zero();
        to_after.assign_mul(&inverse, after).log();
        let mut to_before = Self::zero();
        to_before.assign_mul(&inverse, before).log();

        let mut step = to_after;
        step.add(&to_before).mul_scalar(-0.25).exp();

        self.assign_mul(center, &step)
    }

    /// Prepare one squad segment from a window of four key rotations
    ///
    /// Neighbours are sign-flipped into the same hemisphere first. Returns
    /// `(tangent at q1, tangent at q2, aligned q2)`; interpolate the segment
    /// with `q1.squad(&a, &b, &c, t)`.
    pub fn squad_setup(q0: &Self, q1: &Self, q2: &Self, q3: &Self) -> (Self, Self, Self) {
        let mut q0 = *q0;
        let mut q2 = *q2;
        let mut q3 = *q3;
        q0.align_hemisphere(q1);
        q2.align_hemisphere(q1);
        q3.align_hemisphere(&q2);

        let mut a = Self::zero();
        a.assign_squad_tangent(&q0, q1, &q2);
        let mut b = Self::zero();
        b.assign_squad_tangent(q1, &q2, &q3);

        (a, b, q2)
    }

    /// Negate when that brings this quaternion closer to `other`
    fn align_hemisphere(&mut self, other: &Self) {
        let mut sum = *self;
        sum.add(other);
        let mut difference = *self;
        difference.sub(other);

        if sum.squared_length() < difference.squared_length() {
            self.mul_scalar(-1.0);
        }
    }

    /// Logarithm of a unit quaternion: a pure quaternion `θ · axis`
    pub fn log(&mut self) -> &mut Self {
        let vector_length = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if vector_length < PRECISION {
            return self.set(0.0, 0.0, 0.0, 0.0);
        }

        let scale = vector_length.atan2(self.w) / vector_length;
        self.set(self.x * scale, self.y * scale, self.z * scale, 0.0)
    }

    /// Exponential of a pure quaternion: a unit rotation
    pub fn exp(&mut self) -> &mut Self {
        let angle = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        if angle < PRECISION {
            return self.set_identity();
        }

        let (sin, cos) = angle.sin_cos();
        let scale = sin / angle;
        self.set(self.x * scale, self.y * scale, self.z * scale, cos)
    }

    /// Four-component length
    pub fn length(&self) -> f64 {
        self.squared_length().sqrt()
    }

    /// Four-component squared length
    pub fn squared_length(&self) -> f64 {
        self.dot(self)
    }

    /// Scale to unit length; the zero quaternion stays zero
    #[allow(clippy::float_cmp)]
    pub fn normalize(&mut self) -> &mut Self {
        let squared = self.squared_length();
        if squared == 1.0 {
            return self;
        }
        if squared == 0.0 {
            log::debug!("normalize of a zero-length quaternion, keeping zero");
            return self;
        }
        self.div_scalar(squared.sqrt())
    }

    /// Whether the length is 1 within [`PRECISION`]
    pub fn is_unit(&self) -> bool {
        (self.squared_length() - 1.0).abs() < PRECISION
    }
}

// SAFETY: repr(C) struct of four f64 fields, no padding, all-zero is valid
#[allow(unsafe_code)]
unsafe impl bytemuck::Zeroable for Quaternion {}
#[allow(unsafe_code)]
unsafe impl bytemuck::Pod for Quaternion {}

impl From<[f64; 4]> for Quaternion {
    fn from([x, y, z, w]: [f64; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(q: Quaternion) -> Self {
        q.to_array()
    }
}

impl TryFrom<&[f64]> for Quaternion {
    type Error = MathError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        check_length(values, 4)?;
        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display::vector(f, "Q", &self.to_array())
    }
}

impl AbsDiffEq for Quaternion {
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

impl RelativeEq for Quaternion {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Mat3x4, Mat4x4};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn about_z(angle: f64) -> Quaternion {
        Quaternion::from_axis_angle(&Vec3::new(0.0, 0.0, 1.0), angle)
    }

    #[test]
    fn test_identity_is_neutral() {
        let q = Quaternion::new(1.0, 2.0, 4.0, 10.0);
        let mut product = Quaternion::identity();
        product.mul(&q);
        assert_eq!(product, q);

        let mut product = q;
        product.mul(&Quaternion::identity());
        assert_eq!(product, q);
        assert_eq!(Quaternion::default(), Quaternion::identity());
    }

    #[test]
    fn test_hamilton_product() {
        let a = Quaternion::new(1.0, 2.0, 4.0, 10.0);
        let b = Quaternion::new(-3.0, 4.0, -5.0, 7.0);

        let mut product = a;
        product.mul(&b);
        assert_eq!(product, Quaternion::new(3.0, 61.0, -32.0, 85.0));

        let mut assigned = Quaternion::zero();
        assigned.assign_mul(&b, &a);
        assert_eq!(assigned, product);

        let mut reversed = Quaternion::zero();
        reversed.assign_mul(&a, &b);
        assert_eq!(reversed, Quaternion::new(-49.0, 47.0, -12.0, 85.0));
    }

    #[test]
    fn test_product_composes_rotations() {
        let first = Quaternion::from_axis_angle(&Vec3::new(1.0, 0.0, 0.0), FRAC_PI_2);
        let second = Quaternion::from_axis_angle(&Vec3::new(0.0, 0.0, 1.0), FRAC_PI_2);
        let mut combined = first;
        combined.mul(&second);

        let mut sequential = Vec3::new(0.0, 1.0, 0.0);
        sequential.mul_quaternion(&first).mul_quaternion(&second);
        let mut at_once = Vec3::new(0.0, 1.0, 0.0);
        at_once.mul_quaternion(&combined);

        assert_abs_diff_eq!(sequential, at_once);
        assert_abs_diff_eq!(at_once, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_from_euler() {
        let q = Quaternion::from_euler(90.0_f64.to_radians(), 0.0, 0.0);
        let h = 0.5_f64.sqrt();
        assert_abs_diff_eq!(q, Quaternion::new(h, 0.0, 0.0, h));

        let q = Quaternion::from_euler(PI, PI, 0.0);
        assert_abs_diff_eq!(q, Quaternion::new(0.0, 0.0, -1.0, 0.0));
    }

    #[test]
    fn test_from_euler_matches_axis_products() {
        let (ax, ay, az) = (0.3, -0.7, 1.1);
        let q = Quaternion::from_euler(ax, ay, az);

        let mut expected = Quaternion::from_axis_angle(&Vec3::new(1.0, 0.0, 0.0), ax);
        expected
            .mul(&Quaternion::from_axis_angle(&Vec3::new(0.0, 1.0, 0.0), ay))
            .mul(&Quaternion::from_axis_angle(&Vec3::new(0.0, 0.0, 1.0), az));

        assert_abs_diff_eq!(q, expected, epsilon = 1e-12);
        assert!(q.is_unit());
    }

    #[test]
    fn test_from_euler_round_trips_through_matrix() {
        let q = Quaternion::from_euler(90.0_f64.to_radians(), 0.0, 0.0);
        let from_quaternion = Mat3x4::from_quaternion(&q);
        let mut rotate_x = Mat3x4::identity();
        rotate_x.set_rotate_x(90.0_f64.to_radians());

        assert_abs_diff_eq!(from_quaternion, rotate_x);
    }

    #[test]
    fn test_from_matrix() {
        let m = Mat3x4::new([0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(Quaternion::from_matrix(&m), Quaternion::new(0.5, 0.5, 0.5, 0.5));
        assert_abs_diff_eq!(Quaternion::from_matrix(&Mat3x4::identity()), Quaternion::identity());

        let q = Quaternion::from_euler(0.4, -1.2, 2.5);
        assert_abs_diff_eq!(
            Quaternion::from_matrix(&Mat4x4::from_quaternion(&q)),
            q,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_from_matrix_half_turns_use_diagonal_branches() {
        for axis in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ] {
            let expected = Quaternion::from_axis_angle(&axis, PI);
            let mut m = Mat3x4::identity();
            m.set_rotate(PI, &axis);

            assert_abs_diff_eq!(Quaternion::from_matrix(&m), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_euler_angle_extraction() {
        let pitch = Quaternion::from_euler(0.3, 0.0, 0.0);
        assert_relative_eq!(pitch.pitch(false), 0.3, epsilon = PRECISION);
        assert_relative_eq!(pitch.pitch(true), 0.3, epsilon = PRECISION);

        let yaw = Quaternion::from_euler(0.0, 0.2, 0.0);
        assert_relative_eq!(yaw.yaw(false), 0.2, epsilon = PRECISION);
        assert_relative_eq!(yaw.yaw(true), 0.2, epsilon = PRECISION);

        let roll = Quaternion::from_euler(0.0, 0.0, 0.4);
        assert_relative_eq!(roll.roll(false), 0.4, epsilon = PRECISION);
        assert_relative_eq!(roll.roll(true), 0.4, epsilon = PRECISION);
        assert_relative_eq!(roll.pitch(false), 0.0, epsilon = PRECISION);
    }

    #[test]
    fn test_invert_and_conjugate() {
        let q = Quaternion::from_euler(0.5, 0.1, -0.9);
        let mut conjugate = q;
        conjugate.conjugate();
        let mut inverse = q;
        inverse.invert();
        assert_abs_diff_eq!(conjugate, inverse);

        let mut product = Quaternion::new(1.0, 2.0, 4.0, 10.0);
        let mut inverse = product;
        inverse.invert();
        product.mul(&inverse);
        assert_abs_diff_eq!(product, Quaternion::identity());

        let mut zero = Quaternion::zero();
        zero.invert();
        assert_eq!(zero, Quaternion::zero());
    }

    #[test]
    fn test_slerp_examples() {
        let mut q = Quaternion::new(1.0, 2.0, 4.0, 10.0);
        q.slerp(&Quaternion::new(-3.0, 4.0, -5.0, 7.0), 0.3, true);
        assert_abs_diff_eq!(q, Quaternion::new(-0.2, 2.6, 1.3, 9.1));

        let a = about_z(0.0);
        let b = about_z(1.0);
        let mut start = Quaternion::zero();
        start.assign_slerp(&a, &b, 0.0, true);
        assert_abs_diff_eq!(start, a);
        let mut end = Quaternion::zero();
        end.assign_slerp(&a, &b, 1.0, true);
        assert_abs_diff_eq!(end, b);

        let mut middle = Quaternion::zero();
        middle.assign_slerp(&a, &b, 0.25, true);
        assert_abs_diff_eq!(middle, about_z(0.25));
        assert!(middle.is_unit());
    }

    #[test]
    fn test_slerp_shortest_path() {
        let a = about_z(0.0);
        let mut far = about_z(1.0);
        far.mul_scalar(-1.0);

        let mut short = Quaternion::zero();
        short.assign_slerp(&a, &far, 0.5, true);
        assert_abs_diff_eq!(short, about_z(0.5));

        let mut long = Quaternion::zero();
        long.assign_slerp(&a, &far, 0.5, false);
        assert_abs_diff_eq!(long, about_z(0.5 - PI));
    }

    #[test]
    fn test_log_and_exp() {
        let mut identity_log = Quaternion::identity();
        identity_log.log();
        assert_eq!(identity_log, Quaternion::zero());

        let mut zero_exp = Quaternion::zero();
        zero_exp.exp();
        assert_eq!(zero_exp, Quaternion::identity());

        let q = Quaternion::from_euler(0.2, 0.9, -0.4);
        let mut round_trip = q;
        round_trip.log().exp();
        assert_abs_diff_eq!(round_trip, q, epsilon = 1e-12);

        let mut half_turn_log = about_z(PI);
        half_turn_log.log();
        assert_abs_diff_eq!(
            half_turn_log,
            Quaternion::new(0.0, 0.0, FRAC_PI_2, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_squad_on_one_axis_matches_slerp() {
        let keys = [about_z(0.0), about_z(0.5), about_z(1.0), about_z(1.5)];
        let (a, b, c) = Quaternion::squad_setup(&keys[0], &keys[1], &keys[2], &keys[3]);

        assert_abs_diff_eq!(a, keys[1], epsilon = 1e-12);
        assert_abs_diff_eq!(b, keys[2], epsilon = 1e-12);
        assert_eq!(c, keys[2]);

        for t in [0.0, 0.3, 0.5, 1.0] {
            let mut squad = keys[1];
            squad.squad(&a, &b, &c, t);
            assert_abs_diff_eq!(squad, about_z(0.5 + 0.5 * t), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_squad_setup_aligns_hemispheres() {
        let mut flipped = about_z(1.0);
        flipped.mul_scalar(-1.0);

        let (_, _, c) =
            Quaternion::squad_setup(&about_z(0.0), &about_z(0.5), &flipped, &about_z(1.5));
        assert_abs_diff_eq!(c, about_z(1.0));
    }

    #[test]
    fn test_squad_endpoints() {
        let keys = [
            Quaternion::from_euler(0.0, 0.0, 0.0),
            Quaternion::from_euler(0.4, 0.1, 0.0),
            Quaternion::from_euler(0.9, 0.3, -0.2),
            Quaternion::from_euler(1.1, 0.8, -0.5),
        ];
        let (a, b, c) = Quaternion::squad_setup(&keys[0], &keys[1], &keys[2], &keys[3]);

        let mut start = Quaternion::zero();
        start.assign_squad(&keys[1], &a, &b, &c, 0.0);
        assert_abs_diff_eq!(start, keys[1], epsilon = 1e-12);

        let mut end = Quaternion::zero();
        end.assign_squad(&keys[1], &a, &b, &c, 1.0);
        assert_abs_diff_eq!(end, keys[2], epsilon = 1e-12);

        let mut in_place = keys[1];
        in_place.squad(&a, &b, &c, 1.0);
        assert_eq!(in_place, end);
    }

    #[test]
    fn test_squad_tangent_in_place_matches_assign() {
        let before = Quaternion::from_euler(0.1, 0.0, 0.0);
        let center = Quaternion::from_euler(0.3, 0.2, 0.0);
        let after = Quaternion::from_euler(0.2, 0.6, 0.1);

        let mut assigned = Quaternion::zero();
        assigned.assign_squad_tangent(&before, &center, &after);
        let mut in_place = center;
        in_place.squad_tangent(&before, &after);

        assert_eq!(assigned, in_place);
        assert!(in_place.is_unit());
    }

    #[test]
    fn test_normalize() {
        let mut q = Quaternion::new(1.0, 2.0, 4.0, 10.0);
        q.normalize();
        assert!(q.is_unit());
        assert_relative_eq!(q.length(), 1.0, epsilon = PRECISION);

        let before = q;
        q.normalize();
        assert_abs_diff_eq!(q, before);

        let mut zero = Quaternion::zero();
        zero.normalize();
        assert_eq!(zero, Quaternion::zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Quaternion::new(1.0, 2.0, 3.0, 4.0).to_string(), "Q[1, 2, 3, 4]");
    }
}
