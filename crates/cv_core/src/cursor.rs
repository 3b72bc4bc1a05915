//! Cursor glyph lookup for the host.

use cv_geometry::HandlePosition;

use crate::hit_test::HitResult;
use crate::interaction::SelectionMode;

/// Platform-neutral cursor glyph requested from the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorIcon {
    #[default]
    Default,
    Crosshair,
    Move,
    ResizeNW,
    ResizeN,
    ResizeNE,
    ResizeE,
    ResizeSE,
    ResizeS,
    ResizeSW,
    ResizeW,
}

/// Everything the cursor decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct CursorContext {
    pub selection_enabled: bool,
    pub mode: SelectionMode,
    pub active_handle: Option<HandlePosition>,
    pub has_selection: bool,
    /// Hit result under the pointer, meaningful while no gesture is active.
    pub hover: HitResult,
}

pub fn cursor_for_handle(handle: HandlePosition) -> CursorIcon {
    match handle {
        HandlePosition::NW => CursorIcon::ResizeNW,
        HandlePosition::N => CursorIcon::ResizeN,
        HandlePosition::NE => CursorIcon::ResizeNE,
        HandlePosition::E => CursorIcon::ResizeE,
        HandlePosition::SE => CursorIcon::ResizeSE,
        HandlePosition::S => CursorIcon::ResizeS,
        HandlePosition::SW => CursorIcon::ResizeSW,
        HandlePosition::W => CursorIcon::ResizeW,
    }
}

/// Pick the cursor for the current gesture or, when idle, for what the pointer hovers.
pub fn cursor_for(ctx: &CursorContext) -> CursorIcon {
    if !ctx.selection_enabled {
        return CursorIcon::Default;
    }

    match ctx.mode {
        SelectionMode::Moving => CursorIcon::Move,
        SelectionMode::Resizing => ctx
            .active_handle
            .map(cursor_for_handle)
            .unwrap_or(CursorIcon::Crosshair),
        SelectionMode::None if ctx.has_selection => match ctx.hover {
            HitResult::Handle(h) => cursor_for_handle(h),
            HitResult::Inside => CursorIcon::Move,
            HitResult::Outside => CursorIcon::Crosshair,
        },
        _ => CursorIcon::Crosshair,
    }
}
