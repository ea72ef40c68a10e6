use super::{Ray, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    pub center: Vec3,
    pub half_extension: Vec3,
}

impl Box3 {
    pub fn new(center: Vec3, half_extension: Vec3) -> Box3 {
        Box3 {
            center,
            half_extension,
        }
    }

    pub fn from_single_point(point: Vec3) -> Box3 {
        Box3::new(point, Vec3::zero())
    }

    /// Builds the box spanned by two opposite corners, in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Box3 {
        let min = Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        Box3 {
            center: (min + max) * 0.5,
            half_extension: (max - min) * 0.5,
        }
    }

    /// Grows the box until it contains `point`.
    pub fn include(&mut self, point: Vec3) {
        let min = self.min();
        let max = self.max();
        *self = Box3::from_corners(
            Vec3::new(min.x.min(point.x), min.y.min(point.y), min.z.min(point.z)),
            Vec3::new(max.x.max(point.x), max.y.max(point.y), max.z.max(point.z)),
        );
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extension
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extension
    }

    /// Slab test. Returns the entry distance and the outward normal of the entry face,
    /// or `None` when the ray misses the box.
    /// The entry distance is negative when the ray starts inside the box.
    pub fn entry(&self, ray: &Ray) -> Option<(f64, Vec3)> {
        let min = self.min();
        let max = self.max();
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        let mut normal = Vec3::zero();

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            if direction == 0.0 {
                // parallel to this slab: either always inside it or never
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }

            let inverse_direction = 1.0 / direction;
            let mut t0 = (min[axis] - origin) * inverse_direction;
            let mut t1 = (max[axis] - origin) * inverse_direction;
            // moving towards +axis the ray enters through the min face
            let mut face_sign = -1.0;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
                face_sign = 1.0;
            }

            if t0 > t_near {
                t_near = t0;
                normal = Vec3::axis(axis) * face_sign;
            }
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        // the whole box is behind the ray origin
        if t_far < 0.0 {
            return None;
        }
        Some((t_near, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Box3 {
        Box3::from_corners(Vec3::new(-1.0, -1.0, -1.0), Vec3::one())
    }

    #[test]
    fn entry_reports_face_normal() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let (t, normal) = unit_box().entry(&ray).unwrap();
        assert_eq!(t, 9.0);
        assert_eq!(normal, Vec3::z_axis());

        let ray = Ray::new(Vec3::new(-5.0, 0.5, 0.0), Vec3::x_axis());
        let (t, normal) = unit_box().entry(&ray).unwrap();
        assert_eq!(t, 4.0);
        assert_eq!(normal, -Vec3::x_axis());
    }

    #[test]
    fn entry_misses_beside_the_box() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_box().entry(&ray).is_none());
    }

    #[test]
    fn entry_is_negative_from_inside() {
        let ray = Ray::new(Vec3::zero(), Vec3::x_axis());
        let (t, _) = unit_box().entry(&ray).unwrap();
        assert!(t < 0.0);
    }

    #[test]
    fn include_grows_the_box() {
        let mut bbox = Box3::from_single_point(Vec3::zero());
        bbox.include(Vec3::new(2.0, -1.0, 0.5));
        assert_eq!(bbox.min(), Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(bbox.max(), Vec3::new(2.0, 0.0, 0.5));
    }
}
