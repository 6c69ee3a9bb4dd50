//! Error types for the layout core

use thiserror::Error;

/// Result type alias for core operations
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Errors raised while setting up the layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The viewport query facility could not be reached
    #[error("Viewport unavailable: {0}")]
    ViewportUnavailable(String),

    /// Media query string could not be parsed
    #[error("Invalid media query: {0}")]
    InvalidQuery(String),

    /// Palette does not hold exactly nine colors
    #[error("Palette must contain exactly {expected} colors, got {actual}")]
    PaletteSize { expected: usize, actual: usize },

    /// Palette entry is not a #RRGGBB color
    #[error("Invalid color at palette index {index}: {value}")]
    InvalidColor { index: usize, value: String },
}
