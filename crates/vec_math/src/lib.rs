//! # Vec Math
//!
//! Small value types for 3D graphics transforms: vectors, affine and
//! projective matrices, and rotation quaternions.
//!
//! ## Features
//!
//! - **Vectors**: [`Vec3`] points/directions and [`Vec4`] homogeneous coordinates
//! - **Matrices**: [`Mat3x4`] affine transforms (implicit `[0, 0, 0, 1]` bottom row)
//!   and [`Mat4x4`] general transforms with projection builders
//! - **Rotations**: [`Quaternion`] with matrix/Euler conversion, slerp and squad
//! - **Upload**: column-major `flatten` for graphics API uniform buffers
//! - **Camera config**: view and projection described in TOML or RON
//!
//! Every arithmetic method mutates its receiver and returns it, so operations
//! chain:
//!
//! ```rust
//! use vec_math::prelude::*;
//!
//! let mut model = Mat3x4::identity();
//! model.translate(1.0, 2.0, 3.0).rotate_y(0.5).scale(2.0, 2.0, 2.0);
//!
//! let mut point = Vec3::new(1.0, 0.0, 0.0);
//! point.mul_mat3x4(&model);
//!
//! let uniform: [f32; 16] = model.flatten_f32();
//! assert_eq!(uniform[15], 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod math;

pub use math::{Mat3x4, Mat4x4, MathError, Quaternion, Vec3, Vec4, PRECISION};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{CameraConfig, Config, ConfigError, Handedness, ProjectionConfig, ViewConfig},
        math::{AffineParts, Mat3x4, Mat4x4, MathError, Quaternion, Vec3, Vec4, PRECISION},
    };
}
