use std::ops;

/// Lengths below this are treated as zero by [`Vec3::normalize`].
pub const NORMALIZE_EPSILON: f64 = 1.0e-8;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<[f64; 3]> for Vec3 {
    #[inline(always)]
    fn from(value: [f64; 3]) -> Self {
        Vec3::new(value[0], value[1], value[2])
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline(always)]
    fn from(value: [f32; 3]) -> Self {
        Vec3::new(value[0] as f64, value[1] as f64, value[2] as f64)
    }
}

impl ops::Index<usize> for Vec3 {
    type Output = f64;

    #[inline(always)]
    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 axis out of range: {}", axis),
        }
    }
}

impl ops::Add<Vec3> for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl ops::AddAssign<Vec3> for Vec3 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl ops::Sub<Vec3> for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl ops::Neg for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl ops::Mul<f64> for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: f64) -> Self::Output {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl ops::Mul<Vec3> for Vec3 {
    type Output = Self;

    /// Component-wise product.
    #[inline(always)]
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl ops::Div<f64> for Vec3 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: f64) -> Self::Output {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Vec3 {
    #[inline(always)]
    pub fn new(x: f64, y: f64, z: f64) -> Vec3 {
        Vec3 { x, y, z }
    }

    #[inline(always)]
    pub fn zero() -> Vec3 {
        Vec3::new(0.0, 0.0, 0.0)
    }

    #[inline(always)]
    pub fn one() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    #[inline(always)]
    pub fn x_axis() -> Vec3 {
        Vec3::new(1.0, 0.0, 0.0)
    }

    #[inline(always)]
    pub fn y_axis() -> Vec3 {
        Vec3::new(0.0, 1.0, 0.0)
    }

    #[inline(always)]
    pub fn z_axis() -> Vec3 {
        Vec3::new(0.0, 0.0, 1.0)
    }

    /// Unit vector along the given axis (0 = x, 1 = y, 2 = z).
    pub fn axis(axis: usize) -> Vec3 {
        match axis {
            0 => Vec3::x_axis(),
            1 => Vec3::y_axis(),
            _ => Vec3::z_axis(),
        }
    }

    #[inline(always)]
    pub fn dot(self: &Self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline(always)]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline(always)]
    pub fn squared_len(self) -> f64 {
        self.dot(self)
    }

    #[inline(always)]
    pub fn len(self) -> f64 {
        self.squared_len().sqrt()
    }

    /// Scales the vector to unit length in place.
    /// Vectors shorter than [`NORMALIZE_EPSILON`] are left untouched.
    #[inline(always)]
    pub fn normalize_mut(&mut self) {
        let len = self.len();
        if len > NORMALIZE_EPSILON {
            let inverse_len = 1.0 / len;
            self.x *= inverse_len;
            self.y *= inverse_len;
            self.z *= inverse_len;
        }
    }

    /// Returns a unit-length copy, or the vector itself when it is (almost) zero.
    #[inline(always)]
    pub fn normalize(self: &Self) -> Vec3 {
        let mut result = *self;
        result.normalize_mut();
        result
    }

    /// Reflects this direction about the unit normal `normal`.
    /// The result leaves the surface on the same side the incoming ray came from.
    #[inline(always)]
    pub fn reflect(self: Self, normal: Vec3) -> Vec3 {
        self - normal * 2.0 * self.dot(normal)
    }

    /// Bends this direction through a surface with unit normal `normal` using Snell's law,
    /// where `ratio` is the incident index over the transmitted index.
    ///
    /// Returns `None` on total internal reflection: no ray is transmitted.
    pub fn refract(self: Self, normal: Vec3, ratio: f64) -> Option<Vec3> {
        let cos_incident = self.dot(normal);
        let sin_transmitted_squared = ratio * ratio * (1.0 - cos_incident * cos_incident);
        if sin_transmitted_squared > 1.0 {
            return None;
        }
        let cos_transmitted = (1.0 - sin_transmitted_squared).sqrt();
        Some(self * ratio - normal * (ratio * cos_incident + cos_transmitted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(
            (a - b).len() < TOLERANCE,
            "expected {:?} to be close to {:?}",
            a,
            b
        );
    }

    #[test]
    fn normalize_gives_unit_length() {
        let v = Vec3::new(3.0, 4.0, 12.0).normalize();
        assert!((v.len() - 1.0).abs() < TOLERANCE);
        assert_close(v, Vec3::new(3.0 / 13.0, 4.0 / 13.0, 12.0 / 13.0));
    }

    #[test]
    fn normalize_unit_vector_is_idempotent() {
        let v = Vec3::new(1.0, 2.0, -2.0).normalize();
        assert_close(v.normalize(), v);
    }

    #[test]
    fn normalize_zero_vector_is_left_unchanged() {
        let mut zero = Vec3::zero();
        zero.normalize_mut();
        assert_eq!(zero, Vec3::zero());

        let tiny = Vec3::new(1e-10, 0.0, 0.0);
        let normalized = tiny.normalize();
        assert_eq!(normalized, tiny);
        assert!(normalized.x.is_finite());
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_close(Vec3::x_axis().cross(Vec3::y_axis()), Vec3::z_axis());
        assert_close(Vec3::y_axis().cross(Vec3::x_axis()), -Vec3::z_axis());
    }

    #[test]
    fn reflect_points_away_from_the_surface() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let reflected = incoming.reflect(Vec3::y_axis());
        assert_close(reflected, Vec3::new(1.0, 1.0, 0.0).normalize());
        assert!(reflected.dot(Vec3::y_axis()) > 0.0);
    }

    #[test]
    fn refract_at_normal_incidence_goes_straight_through() {
        let incoming = Vec3::new(0.0, 0.0, -1.0);
        let refracted = incoming.refract(Vec3::z_axis(), 1.0 / 1.5);
        assert_close(refracted.unwrap_or(Vec3::zero()), incoming);
    }

    #[test]
    fn refract_bends_towards_the_normal_in_denser_medium() {
        let incoming = Vec3::new(1.0, -1.0, 0.0).normalize();
        let refracted = incoming.refract(Vec3::y_axis(), 1.0 / 1.5).unwrap();
        assert!((refracted.len() - 1.0).abs() < 1e-9);
        // sin(theta_t) = sin(45deg) / 1.5
        let expected_sin = (0.5f64).sqrt() / 1.5;
        assert!((refracted.x - expected_sin).abs() < 1e-9);
        assert!(refracted.y < 0.0);
    }

    #[test]
    fn refract_reports_total_internal_reflection() {
        // leaving glass at a grazing angle
        let incoming = Vec3::new(1.0, -0.2, 0.0).normalize();
        assert_eq!(incoming.refract(Vec3::y_axis(), 1.5), None);
    }

    #[test]
    fn index_reads_components() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!((v[0], v[1], v[2]), (1.0, 2.0, 3.0));
        assert_eq!(Vec3::axis(1), Vec3::y_axis());
    }
}
