//! Terrain configuration errors.

/// Invalid caller-supplied generation parameters. Generation fails fast and
/// no partial mesh is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Terrain size must be positive and finite.
    #[error("terrain size must be positive and finite, got {0}")]
    InvalidSize(f64),

    /// The mesh needs at least one segment per side.
    #[error("segment count must be positive, got {0}")]
    InvalidSegments(u32),

    /// The vertex count would overflow 32-bit mesh indices.
    #[error("segment count {segments} exceeds the maximum of {max}")]
    TooManySegments {
        /// Requested segments per side.
        segments: u32,
        /// Largest supported value.
        max: u32,
    },

    /// At least one octave is required.
    #[error("octave count must be at least 1, got {0}")]
    InvalidOctaves(u32),

    /// A numeric parameter is NaN or infinite.
    #[error("parameter `{name}` must be finite, got {value}")]
    NonFinite {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}
