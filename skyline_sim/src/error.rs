//! Error types for scene setup.
//!
//! Everything that can fail happens before the first frame: reading the mask
//! image and the configuration file.  Once a [`Scene`](crate::Scene) exists,
//! its per-frame operations are infallible.

use std::fmt;

/// Errors that can occur while building a scene.
#[derive(Debug)]
pub enum SceneError {
    /// The mask image could not be opened or decoded.
    MaskLoad(image::ImageError),
    /// The mask image has a zero width or height.
    EmptyMask,
    /// Failed to read a file from disk.
    Io(std::io::Error),
    /// The configuration file is not valid TOML for [`SceneConfig`](crate::SceneConfig).
    Config(toml::de::Error),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::MaskLoad(e) => write!(f, "Failed to load mask image: {}", e),
            SceneError::EmptyMask => write!(f, "Mask image has no pixels; cannot size the canvas"),
            SceneError::Io(e) => write!(f, "Failed to read file: {}", e),
            SceneError::Config(e) => write!(f, "Invalid scene configuration: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::MaskLoad(e) => Some(e),
            SceneError::Io(e) => Some(e),
            SceneError::Config(e) => Some(e),
            SceneError::EmptyMask => None,
        }
    }
}

impl From<image::ImageError> for SceneError {
    fn from(e: image::ImageError) -> Self {
        SceneError::MaskLoad(e)
    }
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<toml::de::Error> for SceneError {
    fn from(e: toml::de::Error) -> Self {
        SceneError::Config(e)
    }
}
