use serde::{Deserialize, Serialize};

use cv_geometry::{Rect, ScalingState};

/// Physical length unit a camera is calibrated in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    Millimeters,
    Centimeters,
    Meters,
    Inches,
    Feet,
    Microns,
}

impl LengthUnit {
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
            Self::Meters => "m",
            Self::Inches => "in",
            Self::Feet => "ft",
            Self::Microns => "um",
        }
    }
}

/// Physical size of one pixel, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitsPerPixel {
    pub x: f64,
    pub y: f64,
    pub unit: LengthUnit,
}

impl Default for UnitsPerPixel {
    fn default() -> Self {
        Self::new(1.0, 1.0, LengthUnit::default())
    }
}

impl UnitsPerPixel {
    pub const fn new(x: f64, y: f64, unit: LengthUnit) -> Self {
        Self { x, y, unit }
    }

    /// Size of one display pixel once the frame is drawn with `scaling`.
    pub fn scaled(&self, scaling: &ScalingState) -> Self {
        Self {
            x: self.x * scaling.scale_ratio_x,
            y: self.y * scaling.scale_ratio_y,
            unit: self.unit,
        }
    }
}

/// Produces the label drawn next to the selection.
pub trait SelectionTextDelegate: Send + Sync {
    /// `selection` is in source pixels; `units_per_pixel` is the camera's unscaled calibration.
    fn selection_text(&self, selection: &Rect, units_per_pixel: &UnitsPerPixel) -> String;
}

/// Width and height in pixels, then in physical units.
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelsAndUnitsText;

impl SelectionTextDelegate for PixelsAndUnitsText {
    fn selection_text(&self, selection: &Rect, units_per_pixel: &UnitsPerPixel) -> String {
        let unit = units_per_pixel.unit.short_name();
        format!(
            "{}px, {}px\n{:.3}{unit}, {:.3}{unit}",
            selection.width as i64,
            selection.height as i64,
            selection.width * units_per_pixel.x,
            selection.height * units_per_pixel.y,
        )
    }
}
