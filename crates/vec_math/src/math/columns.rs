//! Column operations shared by the row-major matrix types
//!
//! Both matrix types store rows of four scalars. Post-multiplying by a
//! translation, scale or rotation only touches columns, so the same code
//! serves the 3-row affine matrix and the full 4-row matrix.

use super::Vec3;

/// Post-multiply by a translation: the fourth column accumulates the
/// offset carried through the first three columns.
pub(crate) fn translate(m: &mut [f64], dx: f64, dy: f64, dz: f64) {
    for row in m.chunks_exact_mut(4) {
        row[3] += row[0] * dx + row[1] * dy + row[2] * dz;
    }
}

/// Post-multiply by a diagonal scale (columns scale, not rows).
pub(crate) fn scale(m: &mut [f64], sx: f64, sy: f64, sz: f64) {
    for row in m.chunks_exact_mut(4) {
        row[0] *= sx;
        row[1] *= sy;
        row[2] *= sz;
    }
}

/// Post-multiply by a rotation in the plane of columns `a` and `b`.
///
/// `rotate_plane(m, 1, 2, ..)` is a rotation about X, `(2, 0)` about Y and
/// `(0, 1)` about Z.
pub(crate) fn rotate_plane(m: &mut [f64], a: usize, b: usize, cos: f64, sin: f64) {
    for row in m.chunks_exact_mut(4) {
        let (ra, rb) = (row[a], row[b]);
        row[a] = ra * cos + rb * sin;
        row[b] = rb * cos - ra * sin;
    }
}

/// Post-multiply the first three columns by a 3x3 linear block.
pub(crate) fn post_multiply_linear(m: &mut [f64], r: &[[f64; 3]; 3]) {
    for row in m.chunks_exact_mut(4) {
        let (c0, c1, c2) = (row[0], row[1], row[2]);
        for (j, value) in row.iter_mut().take(3).enumerate() {
            *value = c0 * r[0][j] + c1 * r[1][j] + c2 * r[2][j];
        }
    }
}

/// Normalized copy of a rotation axis.
pub(crate) fn unit_axis(axis: &Vec3) -> [f64; 3] {
    let mut axis = *axis;
    axis.normalize();
    axis.to_array()
}

/// Rotation of `theta` radians about a unit `axis` (Rodrigues' formula).
pub(crate) fn axis_rotation(theta: f64, axis: [f64; 3]) -> [[f64; 3]; 3] {
    let [x, y, z] = axis;
    let (s, c) = theta.sin_cos();
    let t = 1.0 - c;

    [
        [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
        [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
        [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
    ]
}

/// Rotation block of a unit quaternion, expanded through doubled products.
pub(crate) fn quaternion_rotation(x: f64, y: f64, z: f64, w: f64) -> [[f64; 3]; 3] {
    let (x2, y2, z2) = (x + x, y + y, z + z);
    let (xx, xy, xz) = (x * x2, x * y2, x * z2);
    let (yy, yz, zz) = (y * y2, y * z2, z * z2);
    let (wx, wy, wz) = (w * x2, w * y2, w * z2);

    [
        [1.0 - (yy + zz), xy - wz, xz + wy],
        [xy + wz, 1.0 - (xx + zz), yz - wx],
        [xz - wy, yz + wx, 1.0 - (xx + yy)],
    ]
}

/// Overwrite the first three columns of the first three rows.
pub(crate) fn write_linear(m: &mut [f64], r: &[[f64; 3]; 3]) {
    for (row, block) in m.chunks_exact_mut(4).zip(r.iter()) {
        row[..3].copy_from_slice(block);
    }
}

/// Read the first three columns of the first three rows.
pub(crate) fn read_linear(m: &[f64]) -> [[f64; 3]; 3] {
    [
        [m[0], m[1], m[2]],
        [m[4], m[5], m[6]],
        [m[8], m[9], m[10]],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unit_axis_normalizes() {
        let [x, y, z] = unit_axis(&Vec3::new(0.0, 3.0, 4.0));
        assert_abs_diff_eq!(x, 0.0);
        assert_abs_diff_eq!(y, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(z, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_rotation_about_diagonal_permutes_axes() {
        let k = 1.0 / 3.0_f64.sqrt();
        let r = axis_rotation(120.0_f64.to_radians(), [k, k, k]);
        let expected = [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

        for (row, expected_row) in r.iter().zip(expected.iter()) {
            for (value, expected_value) in row.iter().zip(expected_row.iter()) {
                assert_abs_diff_eq!(*value, *expected_value, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_rotate_plane_matches_linear_post_multiply() {
        let mut by_plane = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let mut by_block = by_plane;
        let theta = 0.3_f64;

        rotate_plane(&mut by_plane, 1, 2, theta.cos(), theta.sin());
        post_multiply_linear(&mut by_block, &axis_rotation(theta, [1.0, 0.0, 0.0]));

        for (a, b) in by_plane.iter().zip(by_block.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_translate_leaves_linear_block() {
        let mut m = [2.0, 0.0, 0.0, 1.0, 0.0, 3.0, 0.0, 1.0, 0.0, 0.0, 4.0, 1.0];
        translate(&mut m, 1.0, 1.0, 1.0);
        assert_eq!(m, [2.0, 0.0, 0.0, 3.0, 0.0, 3.0, 0.0, 4.0, 0.0, 0.0, 4.0, 5.0]);
    }
}
