// Camera view error types

use std::io;
use thiserror::Error;

use cv_core::SelectionError;
use cv_geometry::{Extent, Rect};

/// Main camera view error type
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("No selection to capture")]
    NoSelection,

    #[error("No frame has been received yet")]
    NoFrame,

    #[error("Selection {selection:?} lies outside the {frame:?} frame")]
    CaptureOutOfBounds { selection: Rect, frame: Extent },

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for camera view operations
pub type ViewResult<T> = std::result::Result<T, ViewError>;
