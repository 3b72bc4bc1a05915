//! Pointer gesture state machine.
//!
//! ```text
//! Idle -> Resizing   (press on a handle)
//! Idle -> Moving     (press inside the selection)
//! Idle -> Creating   (press anywhere else)
//!
//! Any  -> Idle       (release)
//! ```
//!
//! The controller never touches the selection itself: [`InteractionController::drag`]
//! proposes a signed display rectangle, the caller commits it through
//! [`crate::selection::SelectionModel::set_display_selection`] and hands the
//! resolved handle back with [`InteractionController::set_active_handle`].

use cv_geometry::{HandlePosition, Point, Rect};
use thiserror::Error;

use crate::hit_test::HitResult;

/// What the current gesture is doing to the selection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    #[default]
    None,
    Creating,
    Moving,
    Resizing,
}

impl SelectionMode {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// A press arrived while another gesture had not been released.
    #[error("press received while a {0:?} gesture is still in progress")]
    GestureInProgress(SelectionMode),
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Gesture {
    #[default]
    Idle,
    Creating {
        /// Press point; the fixed corner of the rectangle being drawn.
        anchor: Point,
    },
    Moving {
        /// Press point minus the selection's display origin.
        offset: Point,
    },
    Resizing {
        handle: HandlePosition,
    },
}

#[derive(Debug, Default, Clone)]
pub struct InteractionController {
    gesture: Gesture,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SelectionMode {
        match self.gesture {
            Gesture::Idle => SelectionMode::None,
            Gesture::Creating { .. } => SelectionMode::Creating,
            Gesture::Moving { .. } => SelectionMode::Moving,
            Gesture::Resizing { .. } => SelectionMode::Resizing,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Handle being dragged, only while resizing.
    pub fn active_handle(&self) -> Option<HandlePosition> {
        match self.gesture {
            Gesture::Resizing { handle } => Some(handle),
            _ => None,
        }
    }

    /// Start a gesture from Idle, dispatching on what the press landed on.
    pub fn press(
        &mut self,
        point: Point,
        hit: HitResult,
        selection: Option<&Rect>,
    ) -> Result<SelectionMode, InteractionError> {
        if !self.is_idle() {
            return Err(InteractionError::GestureInProgress(self.mode()));
        }

        self.gesture = match (hit, selection) {
            (HitResult::Handle(handle), Some(_)) => Gesture::Resizing { handle },
            (HitResult::Inside, Some(rect)) => Gesture::Moving {
                offset: Point::new(point.x - rect.x, point.y - rect.y),
            },
            _ => Gesture::Creating { anchor: point },
        };

        Ok(self.mode())
    }

    /// Signed display rectangle for the pointer at `point`, or `None` if there is
    /// nothing to update (idle, or no selection to move/resize).
    pub fn drag(&self, point: Point, selection: Option<&Rect>) -> Option<Rect> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Creating { anchor } => Some(Rect::new(
                anchor.x,
                anchor.y,
                point.x - anchor.x,
                point.y - anchor.y,
            )),
            Gesture::Moving { offset } => selection.map(|r| {
                Rect::new(point.x - offset.x, point.y - offset.y, r.width, r.height)
            }),
            Gesture::Resizing { handle } => selection.map(|r| resize_rect(r, handle, point)),
        }
    }

    /// Record the handle resolved after a drag flipped the rectangle.
    pub fn set_active_handle(&mut self, handle: Option<HandlePosition>) {
        if let (Gesture::Resizing { handle: current }, Some(resolved)) = (&mut self.gesture, handle)
        {
            *current = resolved;
        }
    }

    /// End the gesture. Returns the mode that was active.
    pub fn release(&mut self) -> SelectionMode {
        let mode = self.mode();
        self.gesture = Gesture::Idle;
        mode
    }

    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

/// Move the edges owned by `handle` to `point`, keeping the opposite edges fixed.
///
/// The result is signed when the pointer crosses the fixed edge.
pub fn resize_rect(rect: &Rect, handle: HandlePosition, point: Point) -> Rect {
    let Rect {
        x: rx,
        y: ry,
        width: rw,
        height: rh,
    } = *rect;
    let (x, y) = (point.x, point.y);

    match handle {
        HandlePosition::NW => Rect::new(x, y, rw - (x - rx), rh - (y - ry)),
        HandlePosition::N => Rect::new(rx, y, rw, rh - (y - ry)),
        HandlePosition::NE => Rect::new(rx, y, x - rx, rh - (y - ry)),
        HandlePosition::E => Rect::new(rx, ry, x - rx, rh),
        HandlePosition::SE => Rect::new(rx, ry, x - rx, y - ry),
        HandlePosition::S => Rect::new(rx, ry, rw, y - ry),
        HandlePosition::SW => Rect::new(x, ry, rw - (x - rx), y - ry),
        HandlePosition::W => Rect::new(x, ry, rw - (x - rx), rh),
    }
}
