//! Errors raised while loading a scene or writing the rendered image.
//! Tracing itself never fails.

use std::io;

use thiserror::Error;

use super::parser::ParserError;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The scene description could not be read.
    #[error("cannot read scene file \"{path}\": {source}")]
    SceneFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The scene description is malformed.
    #[error(transparent)]
    Parse(#[from] ParserError),

    /// A mesh referenced by the scene could not be loaded.
    #[error("cannot load model \"{path}\": {message}")]
    Model { path: String, message: String },

    /// The rendered image could not be encoded or written.
    #[error("cannot write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
