//! Selection rectangle held in source space with a cached display projection.
//!
//! The source rectangle is authoritative. The display rectangle is always
//! `scaling.to_display(source)` for the scaling last handed to the model, and is
//! `None` while no mapping is available. Both fields change only inside the
//! methods below, so a reader never observes one updated without the other.

use cv_geometry::{HandlePosition, Rect, ScalingState, normalize, resolve_opposite_handle};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No scaling state exists, so display coordinates cannot be back-projected.
    #[error("no mapping between display and source space is available")]
    MappingUnavailable,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SelectionModel {
    source: Option<Rect>,
    display: Option<Rect>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection in source (camera pixel) space.
    pub fn source(&self) -> Option<Rect> {
        self.source
    }

    /// Current selection projected into display space, if a mapping exists.
    pub fn display(&self) -> Option<Rect> {
        self.display
    }

    pub fn has_selection(&self) -> bool {
        self.source.is_some()
    }

    /// Replace the selection from source-space coordinates.
    ///
    /// `None` clears it. A signed rectangle is accepted: the active handle is
    /// resolved against it before normalizing, and the resolved handle is returned.
    /// Without `scaling` the rectangle is stored and projected on the next
    /// [`SelectionModel::reproject`].
    pub fn set_source_selection(
        &mut self,
        rect: Option<Rect>,
        active_handle: Option<HandlePosition>,
        scaling: Option<&ScalingState>,
    ) -> Option<HandlePosition> {
        let Some(rect) = rect else {
            self.clear();
            return None;
        };

        let handle = active_handle.map(|h| resolve_opposite_handle(&rect, h));
        let source = normalize(rect);

        self.source = Some(source);
        self.display = scaling.map(|s| s.to_display(&source));
        handle
    }

    /// Replace the selection from display-space coordinates (the pointer-drag path).
    ///
    /// The source rectangle is snapped to whole source pixels and the display
    /// cache is re-derived from it. On error the model is left untouched.
    pub fn set_display_selection(
        &mut self,
        rect: Rect,
        active_handle: Option<HandlePosition>,
        scaling: Option<&ScalingState>,
    ) -> Result<Option<HandlePosition>, SelectionError> {
        let scaling = scaling.ok_or(SelectionError::MappingUnavailable)?;

        let handle = active_handle.map(|h| resolve_opposite_handle(&rect, h));
        let display = normalize(rect);
        let source = scaling.to_source(&display).round();

        self.source = Some(source);
        self.display = Some(scaling.to_display(&source));
        Ok(handle)
    }

    /// Re-derive the display projection after the scaling changed.
    pub fn reproject(&mut self, scaling: &ScalingState) {
        self.display = self.source.map(|s| scaling.to_display(&s));
    }

    /// Drop the display projection; the source rectangle is kept.
    pub fn invalidate(&mut self) {
        self.display = None;
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.display = None;
    }
}
