//! Aspect-preserving fit of the camera image into the drawing surface.
//!
//! [`recompute`] produces a [`ScalingState`] that converts rectangles between
//! source (camera pixel) space and display (surface) space. Conversions always
//! use the per-axis ratio: after integer truncation of the scaled extent the two
//! ratios can differ slightly, and that difference is kept rather than corrected.

use thiserror::Error;

use crate::{Extent, Point, Rect};

/// Why no mapping between source and display space is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("source extent {0:?} has a zero dimension")]
    DegenerateSource(Extent),

    #[error("destination extent {0:?} has a zero dimension")]
    DegenerateDestination(Extent),

    #[error("image {image:?} scales to nothing inside {destination:?}")]
    DegenerateScaledImage { image: Extent, destination: Extent },
}

/// Derived centering and ratio data, recomputed whenever either extent changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingState {
    pub source: Extent,
    pub destination: Extent,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub origin_x: i32,
    pub origin_y: i32,
    /// Source units per scaled pixel along x (`source.width / scaled_width`).
    pub scale_ratio_x: f64,
    /// Source units per scaled pixel along y (`source.height / scaled_height`).
    pub scale_ratio_y: f64,
}

/// Fit `source` into `destination` without cropping and center it.
pub fn recompute(source: Extent, destination: Extent) -> Result<ScalingState, MappingError> {
    if source.is_degenerate() {
        return Err(MappingError::DegenerateSource(source));
    }
    if destination.is_degenerate() {
        return Err(MappingError::DegenerateDestination(destination));
    }

    let src_w = f64::from(source.width);
    let src_h = f64::from(source.height);
    let dest_w = f64::from(destination.width);
    let dest_h = f64::from(destination.height);

    let height_ratio = src_h / dest_h;
    let width_ratio = src_w / dest_w;

    let (scaled_width, scaled_height) = if height_ratio > width_ratio {
        let scaled_height = destination.height;
        let scaled_width = (f64::from(scaled_height) * (src_w / src_h)) as u32;
        (scaled_width, scaled_height)
    } else {
        let scaled_width = destination.width;
        let scaled_height = (f64::from(scaled_width) * (src_h / src_w)) as u32;
        (scaled_width, scaled_height)
    };

    if scaled_width == 0 || scaled_height == 0 {
        return Err(MappingError::DegenerateScaledImage {
            image: source,
            destination,
        });
    }

    // Both differences are non-negative because the scaled image fits.
    let origin_x = ((destination.width - scaled_width.min(destination.width)) / 2) as i32;
    let origin_y = ((destination.height - scaled_height.min(destination.height)) / 2) as i32;

    Ok(ScalingState {
        source,
        destination,
        scaled_width,
        scaled_height,
        origin_x,
        origin_y,
        scale_ratio_x: src_w / f64::from(scaled_width),
        scale_ratio_y: src_h / f64::from(scaled_height),
    })
}

impl ScalingState {
    /// The on-surface rectangle covered by the scaled image.
    pub fn image_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.origin_x),
            f64::from(self.origin_y),
            f64::from(self.scaled_width),
            f64::from(self.scaled_height),
        )
    }

    /// Project a source-space rectangle into display space.
    pub fn to_display(&self, r: &Rect) -> Rect {
        Rect::new(
            f64::from(self.origin_x) + r.x / self.scale_ratio_x,
            f64::from(self.origin_y) + r.y / self.scale_ratio_y,
            r.width / self.scale_ratio_x,
            r.height / self.scale_ratio_y,
        )
    }

    /// Back-project a display-space rectangle into source space.
    pub fn to_source(&self, r: &Rect) -> Rect {
        Rect::new(
            (r.x - f64::from(self.origin_x)) * self.scale_ratio_x,
            (r.y - f64::from(self.origin_y)) * self.scale_ratio_y,
            r.width * self.scale_ratio_x,
            r.height * self.scale_ratio_y,
        )
    }

    pub fn point_to_source(&self, p: Point) -> Point {
        Point::new(
            (p.x - f64::from(self.origin_x)) * self.scale_ratio_x,
            (p.y - f64::from(self.origin_y)) * self.scale_ratio_y,
        )
    }

    pub fn point_to_display(&self, p: Point) -> Point {
        Point::new(
            f64::from(self.origin_x) + p.x / self.scale_ratio_x,
            f64::from(self.origin_y) + p.y / self.scale_ratio_y,
        )
    }
}
