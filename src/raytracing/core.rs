use std::vec::Vec;

use super::colour::Colour;
use super::math::{is_real_hit, Ray, Vec3};
use super::solid::{RayHittable, Solid};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Colour,
    pub diffuse: Colour,
    pub specular: Colour,
    /// Blinn-Phong specular exponent.
    pub shininess: f64,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: Colour::grey(0.1),
            diffuse: Colour::grey(0.5),
            specular: Colour::grey(0.5),
            shininess: 32.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub colour: Colour,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub solid: Solid,
    pub material: Material,
}

/// Intersection of a ray with a single solid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub t: f64,
    pub point: Vec3,
    pub normal: Vec3,
}

impl HitResult {
    /// Keeps the intersection only when `t` lies strictly between 0 and `FARFAR_AWAY`.
    #[inline(always)]
    pub fn accept(t: f64, point: Vec3, normal: Vec3) -> Option<HitResult> {
        if is_real_hit(t) {
            Some(HitResult { t, point, normal })
        } else {
            None
        }
    }
}

/// Intersection of a ray with the scene: the hit plus the object that was hit.
#[derive(Clone, Copy, Debug)]
pub struct RaycastResult<'a> {
    pub object: &'a SceneObject,
    pub t: f64,
    pub hit_point: Vec3,
    pub normal: Vec3,
}

/// What the trace engine needs from a scene.
pub trait SceneQuery {
    /// Closest object along `ray`. Shadow probes only ask whether anything is in the way,
    /// so implementations may return any hit for them.
    fn nearest_hit(&self, ray: &Ray, shadow_ray: bool) -> Option<RaycastResult<'_>>;

    /// Point lights, in a stable order.
    fn lights(&self) -> &[Light];
}

#[derive(Debug, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    pub background: Colour,
}

impl Scene {
    pub fn add(&mut self, solid: Solid, material: Material) {
        self.objects.push(SceneObject { solid, material });
    }
}

impl SceneQuery for Scene {
    fn nearest_hit(&self, ray: &Ray, shadow_ray: bool) -> Option<RaycastResult<'_>> {
        let mut closest: Option<RaycastResult> = None;
        for object in &self.objects {
            let Some(hit) = object.solid.hit(ray) else {
                continue;
            };
            let result = RaycastResult {
                object,
                t: hit.t,
                hit_point: hit.point,
                normal: hit.normal,
            };
            if shadow_ray {
                return Some(result);
            }
            if closest.map_or(true, |current| hit.t < current.t) {
                closest = Some(result);
            }
        }
        closest
    }

    fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::solid::{Plane, Sphere};

    fn two_spheres() -> Scene {
        let mut scene = Scene::default();
        // far sphere first so scan order and distance order disagree
        scene.add(
            Solid::Sphere(Sphere::new(Vec3::new(0.0, 0.0, -20.0), 1.0)),
            Material::default(),
        );
        scene.add(
            Solid::Sphere(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0)),
            Material::default(),
        );
        scene
    }

    #[test]
    fn nearest_hit_picks_the_closest_object() {
        let scene = two_spheres();
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.nearest_hit(&ray, false).unwrap();
        assert_eq!(hit.t, 4.0);
        assert_eq!(hit.hit_point, Vec3::new(0.0, 0.0, -4.0));
        assert!(std::ptr::eq(hit.object, &scene.objects[1]));
    }

    #[test]
    fn shadow_probe_stops_at_the_first_hit() {
        let scene = two_spheres();
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let hit = scene.nearest_hit(&ray, true).unwrap();
        assert!(std::ptr::eq(hit.object, &scene.objects[0]));
    }

    #[test]
    fn nearest_hit_misses_empty_directions() {
        let scene = two_spheres();
        let ray = Ray::new(Vec3::zero(), Vec3::z_axis());
        assert!(scene.nearest_hit(&ray, false).is_none());
        assert!(Scene::default().nearest_hit(&ray, false).is_none());
    }

    #[test]
    fn plane_is_hit_through_the_scene() {
        let mut scene = Scene::default();
        scene.add(Solid::Plane(Plane::default()), Material::default());
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = scene.nearest_hit(&ray, false).unwrap();
        assert_eq!(hit.t, 5.0);
        assert_eq!(hit.normal, Vec3::y_axis());
    }
}
