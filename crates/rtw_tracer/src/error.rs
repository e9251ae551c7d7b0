//! Error types for configuring, rendering and writing images.

use std::path::PathBuf;

use thiserror::Error;

/// Camera or render settings that the frame math cannot work with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image width must be at least 1 pixel")]
    ZeroWidth,

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("vertical field of view must lie in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("defocus angle must be non-negative and finite, got {0}")]
    InvalidDefocusAngle(f32),

    #[error("focus distance must be positive and finite, got {0}")]
    InvalidFocusDistance(f32),

    #[error("look-from and look-at are the same point")]
    DegenerateViewDirection,

    #[error("up vector is parallel to the view direction")]
    DegenerateUpVector,

    #[error("worker thread count must be at least 1")]
    ZeroThreads,
}

/// Errors that can occur during a render or while saving its output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to encode image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {width}x{height} is too large to encode")]
    ImageTooLarge { width: usize, height: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
