use super::core::HitResult;
use super::math::{Box3, Ray, Vec3};

/// Anything a ray can be tested against.
pub trait RayHittable {
    /// Nearest accepted intersection, `None` when the ray misses.
    fn hit(&self, ray: &Ray) -> Option<HitResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidKind {
    Plane,
    Sphere,
    Triangle,
    Box,
}

impl SolidKind {
    /// Only spheres and boxes spawn reflection and refraction rays.
    pub fn bounces_light(self) -> bool {
        matches!(self, SolidKind::Sphere | SolidKind::Box)
    }
}

/// Infinite plane `normal . x + offset = 0`, visible from the side its normal points to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f64,
}

impl Plane {
    /// Plane of the points `x` with `normal . x = distance`.
    pub fn new(normal: Vec3, distance: f64) -> Plane {
        Plane {
            normal: normal.normalize(),
            offset: -distance,
        }
    }
}

impl Default for Plane {
    /// The xz plane facing +y.
    fn default() -> Self {
        Plane::new(Vec3::y_axis(), 0.0)
    }
}

/// Front-face test shared by planes and triangles.
/// Rays running parallel to the plane or reaching its back face never hit,
/// and are rejected before the division.
fn plane_intersection(normal: Vec3, offset: f64, ray: &Ray) -> Option<(f64, Vec3)> {
    let facing = ray.direction.dot(normal);
    if !(facing < 0.0) {
        return None;
    }
    let t = -(ray.origin.dot(normal) + offset) / facing;
    Some((t, ray.at(t)))
}

impl RayHittable for Plane {
    fn hit(&self, ray: &Ray) -> Option<HitResult> {
        let (t, point) = plane_intersection(self.normal, self.offset, ray)?;
        HitResult::accept(t, point, self.normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Sphere {
        Sphere { center, radius }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Sphere::new(Vec3::zero(), 2.0)
    }
}

impl RayHittable for Sphere {
    fn hit(&self, ray: &Ray) -> Option<HitResult> {
        // t^2 (d.d) + 2t (d.(o-c)) + (o-c).(o-c) - r^2 = 0
        let oc = ray.origin - self.center;
        let a = ray.direction.squared_len();
        let half_b = ray.direction.dot(oc);
        let c = oc.squared_len() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;

        let t = if discriminant < 0.0 {
            return None;
        } else if discriminant == 0.0 {
            // tangent ray
            -half_b / a
        } else {
            let root = discriminant.sqrt();
            let t_minus = (-half_b - root) / a;
            let t_plus = (-half_b + root) / a;
            t_minus.min(t_plus)
        };

        let point = ray.at(t);
        HitResult::accept(t, point, (point - self.center).normalize())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    vertices: [Vec3; 3],
    normal: Vec3,
}

impl Triangle {
    /// The face normal follows the winding `v0 -> v1 -> v2` (right-hand rule).
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Triangle {
        Triangle {
            vertices: [v0, v1, v2],
            normal: face_normal(v0, v1, v2),
        }
    }

    pub fn set(&mut self, v0: Vec3, v1: Vec3, v2: Vec3) {
        *self = Triangle::new(v0, v1, v2);
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Default for Triangle {
    /// Small triangle five units down -z, facing the default camera.
    fn default() -> Self {
        Triangle {
            vertices: [
                Vec3::new(-1.0, 0.0, -5.0),
                Vec3::new(0.0, 1.0, -5.0),
                Vec3::new(1.0, 0.0, -5.0),
            ],
            normal: Vec3::z_axis(),
        }
    }
}

fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize()
}

impl RayHittable for Triangle {
    fn hit(&self, ray: &Ray) -> Option<HitResult> {
        let [v0, v1, v2] = self.vertices;
        let offset = -v0.dot(self.normal);
        let (t, point) = plane_intersection(self.normal, offset, ray)?;

        // barycentric coordinates of the point relative to v0
        let edge0 = v2 - v0;
        let edge1 = v1 - v0;
        let to_point = point - v0;

        let dot00 = edge0.dot(edge0);
        let dot01 = edge0.dot(edge1);
        let dot02 = edge0.dot(to_point);
        let dot11 = edge1.dot(edge1);
        let dot12 = edge1.dot(to_point);

        let inverse_denominator = 1.0 / (dot00 * dot11 - dot01 * dot01);
        let u = (dot11 * dot02 - dot01 * dot12) * inverse_denominator;
        let v = (dot00 * dot12 - dot01 * dot02) * inverse_denominator;

        // the edge opposite v0 (u + v == 1) is outside
        if !(u >= 0.0 && v >= 0.0 && u + v < 1.0) {
            return None;
        }
        HitResult::accept(t, point, self.normal)
    }
}

impl RayHittable for Box3 {
    fn hit(&self, ray: &Ray) -> Option<HitResult> {
        let (t, normal) = self.entry(ray)?;
        HitResult::accept(t, ray.at(t), normal)
    }
}

/// Closed set of renderable shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solid {
    Plane(Plane),
    Sphere(Sphere),
    Triangle(Triangle),
    Box(Box3),
}

impl Solid {
    pub fn kind(&self) -> SolidKind {
        match self {
            Solid::Plane(_) => SolidKind::Plane,
            Solid::Sphere(_) => SolidKind::Sphere,
            Solid::Triangle(_) => SolidKind::Triangle,
            Solid::Box(_) => SolidKind::Box,
        }
    }
}

impl RayHittable for Solid {
    fn hit(&self, ray: &Ray) -> Option<HitResult> {
        match self {
            Solid::Plane(plane) => plane.hit(ray),
            Solid::Sphere(sphere) => sphere.hit(ray),
            Solid::Triangle(triangle) => triangle.hit(ray),
            Solid::Box(bbox) => bbox.hit(ray),
        }
    }
}
