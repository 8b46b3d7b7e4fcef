//! Math types and operations
//!
//! Provides the value types used to build and compose 3D transforms:
//! - [`Vec3`] and [`Vec4`] vectors
//! - [`Quaternion`] rotations
//! - [`Mat3x4`] affine matrices and [`Mat4x4`] general matrices
//!
//! All types store `f64` components. Matrices are stored row-major and
//! flattened column-major for upload.

mod columns;
mod display;
pub mod interop;
mod mat3x4;
mod mat4x4;
mod quaternion;
mod vec3;
mod vec4;

pub use mat3x4::Mat3x4;
pub use mat4x4::Mat4x4;
pub use quaternion::Quaternion;
pub use vec3::Vec3;
pub use vec4::Vec4;

/// Comparison precision used by `is_unit` checks and approximate equality
pub const PRECISION: f64 = 1e-6;

/// Errors from the checked operations
///
/// Unchecked arithmetic never fails: degenerate input produces a defined
/// fallback value instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Matrix has no inverse
    #[error("Matrix is singular (determinant {determinant})")]
    Singular {
        /// Determinant that was found to be zero within [`PRECISION`]
        determinant: f64,
    },

    /// Component slice has the wrong length
    #[error("Expected {expected} components, got {actual}")]
    WrongLength {
        /// Number of components the type stores
        expected: usize,
        /// Length of the slice that was given
        actual: usize,
    },
}

/// Read access to the affine parts shared by [`Mat3x4`] and [`Mat4x4`]
///
/// Lets quaternion and vector operations accept either matrix type.
pub trait AffineParts {
    /// The upper-left 3x3 block, row-major
    fn linear(&self) -> [[f64; 3]; 3];

    /// The first three entries of the fourth column
    fn translation_column(&self) -> [f64; 3];
}

/// Check a slice length before copying it into a fixed-size array
pub(crate) fn check_length(values: &[f64], expected: usize) -> Result<(), MathError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(MathError::WrongLength {
            expected,
            actual: values.len(),
        })
    }
}
