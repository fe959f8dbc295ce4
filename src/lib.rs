use thiserror::Error;

/// Blob extraction from binary foreground masks
pub mod blobs;

/// Synthetic mask generators used by demos and tests
pub mod examples;

/// Background subtraction capability and foreground post-processing
pub mod foreground;

/// Foreground stage chained with the tracking engine
pub mod pipeline;

/// Frequently used types
pub mod prelude;

/// Tracked object entity and lifecycle notifications
pub mod track;

/// Association, lifecycle management and the per-frame engine
pub mod trackers;

/// Geometry and display helpers
pub mod utils;

#[cfg(feature = "python")]
mod py;

#[derive(Error, Debug, Clone)]
pub enum Errors {
    #[error("Mask size {mask:?} doesn't match the frame size {frame:?}.")]
    MaskSizeMismatch {
        mask: (u32, u32),
        frame: (u32, u32),
    },
    #[error("Static mask size {mask:?} doesn't match the foreground size {foreground:?}.")]
    StaticMaskSizeMismatch {
        mask: (u32, u32),
        foreground: (u32, u32),
    },
    #[error("Frame is empty - foreground cannot be calculated.")]
    EmptyFrame,
    #[error("Thread pool must have at least one thread.")]
    ThreadPoolSize,
}

#[cfg(test)]
pub(crate) const EPS: f32 = 0.00001;
