//! Conversions to and from `nalgebra`
//!
//! Lets the value types feed code built on `nalgebra` (physics, scene
//! graphs) without hand-copying components.

use nalgebra::{Matrix3x4, Matrix4, UnitQuaternion, Vector3, Vector4};

use super::{Mat3x4, Mat4x4, Quaternion, Vec3, Vec4};

impl From<Vec3> for Vector3<f64> {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3<f64>> for Vec3 {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec4> for Vector4<f64> {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4<f64>> for Vec4 {
    fn from(v: Vector4<f64>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f64> {
    fn from(q: Quaternion) -> Self {
        Self::new(q.w, q.x, q.y, q.z)
    }
}

impl From<nalgebra::Quaternion<f64>> for Quaternion {
    fn from(q: nalgebra::Quaternion<f64>) -> Self {
        Self::new(q.i, q.j, q.k, q.w)
    }
}

impl From<UnitQuaternion<f64>> for Quaternion {
    fn from(q: UnitQuaternion<f64>) -> Self {
        q.into_inner().into()
    }
}

impl From<Mat3x4> for Matrix3x4<f64> {
    fn from(m: Mat3x4) -> Self {
        Self::from_row_slice(m.as_array())
    }
}

impl From<Matrix3x4<f64>> for Mat3x4 {
    fn from(m: Matrix3x4<f64>) -> Self {
        let mut values = [0.0; 12];
        // Column-major storage of the transpose is row-major storage of `m`
        values.copy_from_slice(m.transpose().as_slice());
        Self::new(values)
    }
}

impl From<Mat3x4> for Matrix4<f64> {
    fn from(m: Mat3x4) -> Self {
        Mat4x4::from(m).into()
    }
}

impl From<Mat4x4> for Matrix4<f64> {
    fn from(m: Mat4x4) -> Self {
        Self::from_row_slice(m.as_array())
    }
}

impl From<Mat4x4> for Matrix4<f32> {
    fn from(m: Mat4x4) -> Self {
        Matrix4::<f64>::from(m).cast::<f32>()
    }
}

impl From<Matrix4<f64>> for Mat4x4 {
    fn from(m: Matrix4<f64>) -> Self {
        let mut values = [0.0; 16];
        values.copy_from_slice(m.transpose().as_slice());
        Self::new(values)
    }
}
