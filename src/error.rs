//! Error types, one enum per concern

use std::path::PathBuf;

use thiserror::Error;

/// Asset loading failures
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("Failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Model {0} contains no geometry")]
    EmptyModel(PathBuf),
    #[error("Loader worker for {0} stopped before delivering a result")]
    Disconnected(String),
    #[error("Loader for {0} produced a different kind of asset")]
    WrongAsset(String),
}

/// Property get/set failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("Unknown property: {0}")]
    Unknown(String),
    #[error("Property {property} expects a {expected} value")]
    TypeMismatch {
        property: String,
        expected: &'static str,
    },
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Value {value} out of range for {property}")]
    OutOfRange { property: String, value: f32 },
    #[error("Value for {0} must be finite")]
    NonFinite(String),
    #[error("Binding target no longer exists")]
    MissingTarget,
}

/// Rendering failures; never fatal to the frame loop
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("Render error: {0}")]
    Other(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
