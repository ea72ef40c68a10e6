use super::Vec3;

/// Affine transform in row-major order, applied to column vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    rows: [[f64; 4]; 4],
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4 {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    pub fn scale(factor: f64) -> Mat4 {
        let mut result = Mat4::identity();
        for i in 0..3 {
            result.rows[i][i] = factor;
        }
        result
    }

    pub fn translate(offset: Vec3) -> Mat4 {
        let mut result = Mat4::identity();
        result.rows[0][3] = offset.x;
        result.rows[1][3] = offset.y;
        result.rows[2][3] = offset.z;
        result
    }

    /// Rotation of `angle` radians around `axis` (right-handed).
    pub fn rotate(axis: Vec3, angle: f64) -> Mat4 {
        // https://en.wikipedia.org/wiki/Rotation_matrix#Rotation_matrix_from_axis_and_angle
        let u = axis.normalize();
        let (sin_t, cos_t) = angle.sin_cos();
        let k = 1.0 - cos_t;
        Mat4 {
            rows: [
                [
                    cos_t + u.x * u.x * k,
                    u.x * u.y * k - u.z * sin_t,
                    u.x * u.z * k + u.y * sin_t,
                    0.0,
                ],
                [
                    u.y * u.x * k + u.z * sin_t,
                    cos_t + u.y * u.y * k,
                    u.y * u.z * k - u.x * sin_t,
                    0.0,
                ],
                [
                    u.z * u.x * k - u.y * sin_t,
                    u.z * u.y * k + u.x * sin_t,
                    cos_t + u.z * u.z * k,
                    0.0,
                ],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Composes two transforms: the result applies `self` first, then `other`.
    pub fn then(&self, other: &Mat4) -> Mat4 {
        let mut rows = [[0.0; 4]; 4];
        for (row, out) in rows.iter_mut().enumerate() {
            for (col, value) in out.iter_mut().enumerate() {
                *value = (0..4)
                    .map(|k| other.rows[row][k] * self.rows[k][col])
                    .sum();
            }
        }
        Mat4 { rows }
    }

    pub fn apply(&self, v: Vec3) -> Vec3 {
        let m = &self.rows;
        let x = m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z + m[0][3];
        let y = m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z + m[1][3];
        let z = m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z + m[2][3];
        let w = m[3][0] * v.x + m[3][1] * v.y + m[3][2] * v.z + m[3][3];
        Vec3::new(x / w, y / w, z / w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).len() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn then_applies_left_transform_first() {
        let transform = Mat4::scale(2.0).then(&Mat4::translate(Vec3::new(1.0, 0.0, 0.0)));
        assert_close(transform.apply(Vec3::one()), Vec3::new(3.0, 2.0, 2.0));

        let transform = Mat4::translate(Vec3::new(1.0, 0.0, 0.0)).then(&Mat4::scale(2.0));
        assert_close(transform.apply(Vec3::one()), Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn rotate_quarter_turn_around_y() {
        let rotation = Mat4::rotate(Vec3::y_axis(), std::f64::consts::FRAC_PI_2);
        assert_close(rotation.apply(Vec3::x_axis()), -Vec3::z_axis());
        assert_close(rotation.apply(Vec3::z_axis()), Vec3::x_axis());
        assert_close(rotation.apply(Vec3::y_axis()), Vec3::y_axis());
    }
}
