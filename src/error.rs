//! Error types for material_lab
//!
//! Each subsystem owns one error enum. The binary wraps them in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to decode a color style string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
    #[error("invalid rgb() color '{0}'")]
    InvalidRgb(String),
    #[error("unsupported color style '{0}'")]
    Unsupported(String),
}

/// Rejected inspector edit
///
/// The material is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InspectorError {
    #[error("no folder with id {0}")]
    UnknownFolder(usize),
    #[error("folder '{folder}' has no field '{field}'")]
    UnknownField { folder: String, field: String },
    #[error("field '{0}' is read-only")]
    ReadOnly(String),
    #[error("field '{field}' expects a {expected} value")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },
    #[error("'{key}' is not a choice of field '{field}'")]
    UnknownChoice { field: String, key: String },
    #[error("{code} is not a valid code for field '{field}'")]
    InvalidChoiceCode { field: String, code: i32 },
    #[error("invalid color for field '{field}': {source}")]
    InvalidColor {
        field: String,
        #[source]
        source: ColorParseError,
    },
    #[error("material {0} does not exist")]
    UnknownMaterial(u32),
}

/// Texture loading failure
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// GPU setup failure
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
    #[error("pipeline '{0}' is not registered")]
    UnknownPipeline(String),
    #[error("shader '{0}' is not loaded")]
    MissingShader(String),
}
