pub mod animation;
pub mod camera;
pub mod error;
pub mod logging;
pub mod units;
pub mod view;

// Re-export the main types
pub use camera::{Camera, Frame, FrameListener};
pub use error::{ViewError, ViewResult};
pub use units::{LengthUnit, PixelsAndUnitsText, SelectionTextDelegate, UnitsPerPixel};
pub use view::{CameraView, PaintSnapshot, RepaintRequester};

pub use cv_core::{CursorIcon, HitResult, SelectionMode};
pub use cv_geometry::{Extent, HandlePosition, Point, Rect, ScalingState};
pub use cv_settings::{ConfigManager, Settings};
