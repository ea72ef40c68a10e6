use super::math::{Ray, Vec3};

/// The orthographic view plane is this many times larger than the perspective one.
const ORTHOGRAPHIC_ZOOM: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    right: Vec3,
    viewport_width: f64,
    viewport_height: f64,
}

impl Default for Camera {
    /// Camera at the origin looking down -z.
    fn default() -> Self {
        Camera::look_at(Vec3::zero(), Vec3::new(0.0, 0.0, -1.0))
    }
}

impl Camera {
    /// Creates a camera that looks at a specific point from a specific position.
    /// The point is referred to be the center of the screen.
    pub fn look_at(position: Vec3, point: Vec3) -> Self {
        let forward = (point - position).normalize();
        let mut right = forward.cross(Vec3::y_axis()).normalize();
        if right.squared_len() < 0.5 {
            // looking straight up or down
            right = Vec3::x_axis();
        }
        // to get an orthonormal base, we should calculate the up vector with two perpendicular vectors
        let up = right.cross(forward).normalize();
        Self {
            position,
            forward,
            up,
            right,
            viewport_width: 1.0,
            viewport_height: 1.0,
        }
    }

    /// Size of the view plane in world units.
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    /// The view plane sits one unit in front of the eye.
    pub fn view_centre(&self) -> Vec3 {
        self.position + self.forward
    }

    /// Ray through the centre of pixel (`row`, `column`) of a `width` x `height` buffer.
    /// Rows are counted upwards from the bottom edge of the view plane.
    pub fn pixel_ray(
        &self,
        row: u32,
        column: u32,
        width: u32,
        height: u32,
        projection: Projection,
    ) -> Ray {
        let (mut plane_width, mut plane_height) = self.viewport();
        if projection == Projection::Orthographic {
            plane_width *= ORTHOGRAPHIC_ZOOM;
            plane_height *= ORTHOGRAPHIC_ZOOM;
        }
        let pixel_dx = plane_width / width as f64;
        let pixel_dy = plane_height / height as f64;

        let start = self.view_centre() - (self.right * plane_width + self.up * plane_height) / 2.0;
        let pixel = start
            + self.up * ((row as f64 + 0.5) * pixel_dy)
            + self.right * ((column as f64 + 0.5) * pixel_dx);

        match projection {
            Projection::Orthographic => Ray::new(pixel, self.forward),
            Projection::Perspective => Ray::new(self.position, (pixel - self.position).normalize()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).len() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn look_at_builds_a_right_handed_basis() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::zero());
        assert_close(camera.forward, Vec3::new(0.0, 0.0, -1.0));
        assert_close(camera.right, Vec3::x_axis());
        assert_close(camera.up, Vec3::y_axis());
    }

    #[test]
    fn look_at_straight_down_still_has_a_basis() {
        let camera = Camera::look_at(Vec3::new(0.0, 10.0, 0.0), Vec3::zero());
        assert_close(camera.right, Vec3::x_axis());
        assert!((camera.up.len() - 1.0).abs() < 1e-9);
        assert!(camera.up.dot(camera.forward).abs() < 1e-9);
    }

    #[test]
    fn centre_pixel_looks_forward() {
        let camera = Camera::default().with_viewport(2.0, 2.0);
        // odd resolution has a pixel exactly in the middle
        let ray = camera.pixel_ray(1, 1, 3, 3, Projection::Perspective);
        assert_eq!(ray.origin, Vec3::zero());
        assert_close(ray.direction, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn perspective_rays_fan_out_from_the_eye() {
        let camera = Camera::default().with_viewport(2.0, 2.0);
        let bottom_left = camera.pixel_ray(0, 0, 2, 2, Projection::Perspective);
        let top_right = camera.pixel_ray(1, 1, 2, 2, Projection::Perspective);
        assert_close(bottom_left.direction, Vec3::new(-0.5, -0.5, -1.0).normalize());
        assert_close(top_right.direction, Vec3::new(0.5, 0.5, -1.0).normalize());
    }

    #[test]
    fn orthographic_rays_are_parallel_on_an_enlarged_plane() {
        let camera = Camera::default().with_viewport(2.0, 2.0);
        let bottom_left = camera.pixel_ray(0, 0, 2, 2, Projection::Orthographic);
        let top_right = camera.pixel_ray(1, 1, 2, 2, Projection::Orthographic);
        assert_eq!(bottom_left.direction, top_right.direction);
        assert_close(bottom_left.origin, Vec3::new(-10.0, -10.0, -1.0));
        assert_close(top_right.origin, Vec3::new(10.0, 10.0, -1.0));
    }
}
