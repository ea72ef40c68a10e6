pub mod camera;
pub mod colour;
pub mod core;
pub mod error;
pub mod lighting;
pub mod math;
pub mod model;
pub mod parser;
pub mod solid;
pub mod tracer;
