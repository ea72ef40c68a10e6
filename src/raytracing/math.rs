#[allow(non_snake_case)]
pub mod box3D;
pub mod mat4;
pub mod ray;
pub mod vec3;

pub use box3D::*;
pub use mat4::*;
pub use ray::*;
pub use vec3::*;
