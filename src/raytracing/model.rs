use std::fs::File;
use std::io::{BufRead, BufReader};

use log::debug;
use obj::{load_obj, Obj, Position};

use super::error::{RenderError, Result};
use super::math::{Box3, Mat4, Vec3};
use super::solid::Triangle;

/// Loads every face of a Wavefront OBJ file as a triangle, placed by `trasform`.
pub fn load_model(path: &str, trasform: &Mat4) -> Result<Vec<Triangle>> {
    let file = File::open(path).map_err(|err| RenderError::Model {
        path: path.to_string(),
        message: err.to_string(),
    })?;
    read_model(BufReader::new(file), path, trasform)
}

/// Same as [`load_model`] for an already opened source; `path` is only used in messages.
pub fn read_model(input: impl BufRead, path: &str, trasform: &Mat4) -> Result<Vec<Triangle>> {
    let obj: Obj<Position, u32> = load_obj(input).map_err(|err| RenderError::Model {
        path: path.to_string(),
        message: err.to_string(),
    })?;

    let vertex = |index: u32| -> Result<Vec3> {
        let position = obj
            .vertices
            .get(index as usize)
            .ok_or_else(|| RenderError::Model {
                path: path.to_string(),
                message: format!("face refers to missing vertex {}", index),
            })?
            .position;
        Ok(trasform.apply(position.into()))
    };

    let mut triangles = Vec::with_capacity(obj.indices.len() / 3);
    for face in obj.indices.chunks_exact(3) {
        triangles.push(Triangle::new(
            vertex(face[0])?,
            vertex(face[1])?,
            vertex(face[2])?,
        ));
    }

    if let Some(first) = triangles.first() {
        let mut bounding_box = Box3::from_single_point(first.vertices()[0]);
        for point in triangles.iter().flat_map(|triangle| triangle.vertices().iter()) {
            bounding_box.include(*point);
        }
        debug!(
            "loaded {} with {} triangles, bounds {:?} to {:?}",
            path,
            triangles.len(),
            bounding_box.min(),
            bounding_box.max()
        );
    }
    Ok(triangles)
}
