//! Resize handles and the lookup that follows a handle when a drag flips the
//! rectangle inside out.

use crate::Rect;

/// The eight resize handles on a rectangle's border: four corners and four edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePosition {
    NW,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
}

impl HandlePosition {
    pub const ALL: [HandlePosition; 8] = [
        Self::NW,
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
    ];

    /// Handle reached by mirroring across a vertical axis (the width flipped).
    fn flip_horizontal(self) -> Self {
        match self {
            Self::NW => Self::NE,
            Self::NE => Self::NW,
            Self::SW => Self::SE,
            Self::SE => Self::SW,
            Self::W => Self::E,
            Self::E => Self::W,
            other => other,
        }
    }

    /// Handle reached by mirroring across a horizontal axis (the height flipped).
    fn flip_vertical(self) -> Self {
        match self {
            Self::NW => Self::SW,
            Self::SW => Self::NW,
            Self::NE => Self::SE,
            Self::SE => Self::NE,
            Self::N => Self::S,
            Self::S => Self::N,
            other => other,
        }
    }

    /// Handle reached through the rectangle's center (both axes flipped).
    ///
    /// Only corners move; edge midpoints stay put when both axes flip.
    fn flip_diagonal(self) -> Self {
        match self {
            Self::NW => Self::SE,
            Self::SE => Self::NW,
            Self::NE => Self::SW,
            Self::SW => Self::NE,
            other => other,
        }
    }

    /// Opposite-handle lookup keyed by which axes of the signed rectangle flipped.
    pub fn opposite(self, width_flipped: bool, height_flipped: bool) -> Self {
        match (width_flipped, height_flipped) {
            (true, true) => self.flip_diagonal(),
            (true, false) => self.flip_horizontal(),
            (false, true) => self.flip_vertical(),
            (false, false) => self,
        }
    }
}

/// Resolve which handle the user is dragging after a drag inverted the rectangle.
///
/// Must be given the signed rectangle, before [`crate::normalize`].
pub fn resolve_opposite_handle(rect: &Rect, handle: HandlePosition) -> HandlePosition {
    handle.opposite(rect.width < 0.0, rect.height < 0.0)
}
