use bitflags::bitflags;
use log::{debug, info, trace, warn};

use super::camera::{Camera, Projection};
use super::colour::Colour;
use super::core::{Scene, SceneQuery};
use super::lighting::calculate_lighting;
use super::math::Ray;

pub const DEFAULT_TRACE_LEVEL: i32 = 5;

/// Relative refractive index for rays entering glass (1.5) from air (1.0).
pub const REFRACTIVE_RATIO: f64 = 1.0 / 1.5;

/// Secondary rays start this far along their direction to avoid hitting their own surface.
pub const SURFACE_BIAS: f64 = 0.1;

/// A blocked shadow probe divides the carried colour by this.
pub const SHADOW_ATTENUATION: f64 = 10.0;

bitflags! {
    /// Independently togglable parts of the renderer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TraceFlags: u32 {
        const AMBIENT = 1 << 0;
        const DIFFUSE_AND_SPECULAR = 1 << 1;
        const SHADOW = 1 << 2;
        const REFLECTION = 1 << 3;
        const REFRACTION = 1 << 4;
        const ORTHOGRAPHIC = 1 << 5;
    }
}

impl Default for TraceFlags {
    fn default() -> Self {
        TraceFlags::all() - TraceFlags::ORTHOGRAPHIC
    }
}

impl TraceFlags {
    pub fn projection(self) -> Projection {
        if self.contains(TraceFlags::ORTHOGRAPHIC) {
            Projection::Orthographic
        } else {
            Projection::Perspective
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayTracer {
    pub flags: TraceFlags,
    /// Recursion budget shared by reflection, refraction and shadow rays.
    pub trace_level: i32,
}

impl Default for RayTracer {
    fn default() -> Self {
        RayTracer::new(TraceFlags::default(), DEFAULT_TRACE_LEVEL)
    }
}

impl RayTracer {
    pub fn new(flags: TraceFlags, trace_level: i32) -> Self {
        RayTracer { flags, trace_level }
    }

    /// Traces every pixel of a `width` x `height` buffer in row-major order,
    /// handing `(column, row, colour)` to `sink`. Row 0 is the bottom of the view plane.
    pub fn render(
        &self,
        scene: &Scene,
        camera: &Camera,
        width: u32,
        height: u32,
        mut sink: impl FnMut(u32, u32, Colour),
    ) {
        if scene.objects.is_empty() {
            warn!("the scene has no objects, the image will only show the background");
        }
        if scene.lights.is_empty() && self.flags.contains(TraceFlags::DIFFUSE_AND_SPECULAR) {
            warn!("lighting is enabled but the scene has no lights");
        }
        debug!(
            "tracing {} objects and {} lights with {:?} at depth {}",
            scene.objects.len(),
            scene.lights.len(),
            self.flags,
            self.trace_level
        );

        info!("Trace start.");
        let projection = self.flags.projection();
        for row in 0..height {
            for column in 0..width {
                let ray = camera.pixel_ray(row, column, width, height, projection);
                // the background is what a pixel shows unless something is hit along the way
                let colour = self.trace_scene(scene, &ray, scene.background, self.trace_level, false);
                sink(column, row, colour);
            }
            trace!("row {}/{} done", row + 1, height);
        }
        info!("Done, traced {} pixels", width as u64 * height as u64);
    }

    /// Colour seen along `ray`.
    ///
    /// `colour` is returned as is when the depth budget is spent or nothing is hit.
    /// Shadow probes that hit anything return `colour` attenuated and never recurse.
    /// Every secondary ray, whatever its kind, is traced with `depth - 1`.
    pub fn trace_scene<S: SceneQuery + ?Sized>(
        &self,
        scene: &S,
        ray: &Ray,
        colour: Colour,
        depth: i32,
        shadow_ray: bool,
    ) -> Colour {
        // reached the maximum depth of the recursion
        if depth <= 0 {
            return colour;
        }

        let Some(result) = scene.nearest_hit(ray, shadow_ray) else {
            return colour;
        };

        if shadow_ray {
            return colour / SHADOW_ATTENUATION;
        }

        let mut out = calculate_lighting(scene.lights(), ray.origin, &result, self.flags);
        let bounces = result.object.solid.kind().bounces_light();

        if self.flags.contains(TraceFlags::REFLECTION) && bounces {
            let direction = ray.direction.reflect(result.normal);
            let reflected = Ray::new(result.hit_point + direction * SURFACE_BIAS, direction);
            out *= self.trace_scene(scene, &reflected, colour, depth - 1, false);
        }

        if self.flags.contains(TraceFlags::REFRACTION) && bounces {
            // total internal reflection transmits nothing, the surface colour is kept
            if let Some(direction) = ray.direction.refract(result.normal, REFRACTIVE_RATIO) {
                let refracted = Ray::new(result.hit_point + direction * SURFACE_BIAS, direction);
                out *= self.trace_scene(scene, &refracted, colour, depth - 1, false);
            }
        }

        if self.flags.contains(TraceFlags::SHADOW) {
            // each probe carries the colour left by the previous one, so lights compound
            for light in scene.lights() {
                let direction = (light.position - result.hit_point).normalize();
                let probe = Ray::new(result.hit_point + direction * SURFACE_BIAS, direction);
                out = self.trace_scene(scene, &probe, out, depth - 1, true);
            }
        }

        out
    }
}
