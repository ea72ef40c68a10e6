use super::colour::Colour;
use super::core::{Light, RaycastResult};
use super::math::Vec3;
use super::solid::SolidKind;
use super::tracer::TraceFlags;

/// Black and white 2x2x2 cells, white wherever one of the cell coordinates is odd.
fn checker(point: Vec3) -> Colour {
    // truncation towards zero, so the cells either side of an axis share parity
    let odd = |coordinate: f64| (coordinate / 2.0) as i64 % 2 != 0;
    if odd(point.x) || odd(point.y) || odd(point.z) {
        Colour::WHITE
    } else {
        Colour::BLACK
    }
}

/// Local Blinn-Phong illumination at a hit point seen from `viewer`.
///
/// The base colour is the material's ambient term, replaced by a checker pattern on planes.
/// Diffuse and specular contributions of every light are added on top of it.
pub fn calculate_lighting(
    lights: &[Light],
    viewer: Vec3,
    hit: &RaycastResult,
    flags: TraceFlags,
) -> Colour {
    let material = &hit.object.material;

    let mut colour = if hit.object.solid.kind() == SolidKind::Plane {
        checker(hit.hit_point)
    } else if flags.contains(TraceFlags::AMBIENT) {
        material.ambient
    } else {
        Colour::BLACK
    };

    if !flags.contains(TraceFlags::DIFFUSE_AND_SPECULAR) {
        return colour;
    }

    let view_direction = (viewer - hit.hit_point).normalize();
    for light in lights {
        let light_direction = (light.position - hit.hit_point).normalize();
        let half_vector = (light_direction + view_direction).normalize();

        let diffuse_effect = light_direction.dot(hit.normal).clamp(0.0, 1.0);
        let diffuse = material.diffuse * light.colour * diffuse_effect;

        let specular_effect = half_vector
            .dot(hit.normal)
            .clamp(0.0, 1.0)
            .powf(material.shininess);
        let specular = material.specular * light.colour * specular_effect;

        colour += diffuse + specular;
    }
    colour
}
