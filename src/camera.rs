//! Camera and frame interfaces the view binds to.

use std::sync::Arc;

use image::RgbaImage;

use cv_geometry::Extent;

use crate::units::UnitsPerPixel;

/// One captured camera image.
#[derive(Debug, Clone)]
pub struct Frame {
    image: Arc<RgbaImage>,
}

impl Frame {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.image.width(), self.image.height())
    }
}

impl From<RgbaImage> for Frame {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

/// Receives frames from a camera. Called on the camera's capture thread.
pub trait FrameListener: Send + Sync {
    fn frame_received(&self, frame: Frame);
}

/// A frame source the view can bind to.
pub trait Camera: Send + Sync {
    fn units_per_pixel(&self) -> UnitsPerPixel;

    /// Deliver frames to `listener`, at most `maximum_fps` per second.
    fn start_continuous_capture(&self, listener: Arc<dyn FrameListener>, maximum_fps: u32);

    /// Stop delivering frames to `listener` (matched by pointer identity).
    fn stop_continuous_capture(&self, listener: &Arc<dyn FrameListener>);
}
