//! Error types
//!
//! Configuration problems abort the run before any geometry is produced.
//! Geometry problems are reported per face or per piece so the caller can
//! drop the offending unit and keep going.

use std::path::PathBuf;

/// Invalid or unreadable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A parameter is outside its allowed range
    #[error("invalid value for `{field}`: {value} ({constraint})")]
    Invalid {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    /// A `min`/`max` pair is inverted
    #[error("`{min_field}` ({min}) must not exceed `{max_field}` ({max})")]
    InvertedRange {
        min_field: &'static str,
        max_field: &'static str,
        min: f32,
        max: f32,
    },

    /// The config file could not be read
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn invalid(
        field: &'static str,
        value: impl ToString,
        constraint: &'static str,
    ) -> Self {
        Self::Invalid {
            field,
            value: value.to_string(),
            constraint,
        }
    }
}

/// A face or piece that cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Face references fewer than three distinct vertices
    #[error("face has {0} distinct vertices (need at least 3)")]
    TooFewVertices(usize),

    /// Face corners are collinear or coincident
    #[error("face has zero area")]
    ZeroArea,

    /// Face references a vertex that does not exist
    #[error("vertex index {index} out of range ({count} vertices)")]
    IndexOutOfRange { index: u32, count: usize },

    /// Piece has no faces or no vertices
    #[error("piece `{0}` is empty")]
    EmptyPiece(String),
}
