use super::Vec3;

/// Distance used as "nothing was hit". A hit only counts when `0 < t < FARFAR_AWAY`.
pub const FARFAR_AWAY: f64 = 1.0e10;

/// Returns true when `t` is a real intersection distance along a ray.
#[inline(always)]
pub fn is_real_hit(t: f64) -> bool {
    t > 0.0 && t < FARFAR_AWAY
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Not necessarily normalised.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray { origin, direction }
    }

    pub fn at(self: &Self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}
