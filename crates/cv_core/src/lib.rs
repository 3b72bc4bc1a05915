//! Selection core for the camera view.
//!
//! Pure state: [`ViewModel`] receives [`Action`]s and returns [`Effect`]s for the
//! host to execute. Nothing here locks, spawns or touches a platform API.

use cv_geometry::{Extent, HandlePosition, Point, Rect, ScalingState, recompute};
use tracing::{debug, trace, warn};

pub mod cursor;
pub mod interaction;
pub mod selection;

pub use cursor::{CursorContext, CursorIcon, cursor_for};
pub use hit_test::{HANDLE_SIZE, HitResult, hit_test};
pub use interaction::{InteractionController, InteractionError, SelectionMode};
pub use selection::{SelectionError, SelectionModel};

/// Input actions (pure).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A frame arrived; only its extent matters here.
    SourceResized { extent: Extent },

    /// The host drawing surface changed size.
    SurfaceResized { extent: Extent },

    /// Turn interactive selection on or off.
    SetSelectionEnabled { enabled: bool },

    /// Programmatic selection change, in source space. `None` clears it.
    SetSelection { selection: Option<Rect> },

    /// Pointer pressed (display space).
    MouseDown { x: i32, y: i32 },

    /// Pointer moved. Drags the active gesture, or updates hover feedback when idle.
    MouseMove { x: i32, y: i32 },

    /// Pointer released.
    MouseUp { x: i32, y: i32 },
}

/// Effects requested by the core (executed by the host).
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The surface contents are out of date.
    Repaint,

    /// The cursor glyph under the pointer changed.
    SetCursor(CursorIcon),

    /// A new scaling state was computed, or the mapping became unavailable (`None`).
    ScalingChanged(Option<ScalingState>),

    /// The selection (source space) changed.
    SelectionChanged { selection: Option<Rect> },
}

/// Camera view core model: scaling, selection, and the gesture state machine.
///
/// Every mutation goes through [`ViewModel::reduce`], so a rescale and a pointer
/// edit are each applied as one step and the selection pair stays matched.
#[derive(Debug)]
pub struct ViewModel {
    source_extent: Option<Extent>,
    destination_extent: Option<Extent>,
    scaling: Option<ScalingState>,
    selection: SelectionModel,
    interaction: InteractionController,
    selection_enabled: bool,
    handle_size: f64,
    hover: HitResult,
    /// Last pointer position seen, in display space.
    pointer: Option<Point>,
    cursor: CursorIcon,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new(true, HANDLE_SIZE)
    }
}

impl ViewModel {
    pub fn new(selection_enabled: bool, handle_size: f64) -> Self {
        Self {
            source_extent: None,
            destination_extent: None,
            scaling: None,
            selection: SelectionModel::new(),
            interaction: InteractionController::new(),
            selection_enabled,
            handle_size,
            hover: HitResult::Outside,
            pointer: None,
            cursor: CursorIcon::Default,
        }
    }

    pub fn scaling(&self) -> Option<&ScalingState> {
        self.scaling.as_ref()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn source_selection(&self) -> Option<Rect> {
        self.selection.source()
    }

    pub fn display_selection(&self) -> Option<Rect> {
        self.selection.display()
    }

    pub fn mode(&self) -> SelectionMode {
        self.interaction.mode()
    }

    pub fn active_handle(&self) -> Option<HandlePosition> {
        self.interaction.active_handle()
    }

    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn source_extent(&self) -> Option<Extent> {
        self.source_extent
    }

    pub fn destination_extent(&self) -> Option<Extent> {
        self.destination_extent
    }

    /// Hit-test a display point against the current selection.
    pub fn hit_test(&self, x: i32, y: i32) -> HitResult {
        hit_test(
            Point::from((x, y)),
            self.selection.display().as_ref(),
            self.handle_size,
        )
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SourceResized { extent } => {
                if self.source_extent == Some(extent) {
                    return Vec::new();
                }
                self.source_extent = Some(extent);
                self.recompute_scaling()
            }

            Action::SurfaceResized { extent } => {
                if self.destination_extent == Some(extent) {
                    return Vec::new();
                }
                self.destination_extent = Some(extent);
                self.recompute_scaling()
            }

            Action::SetSelectionEnabled { enabled } => {
                if self.selection_enabled == enabled {
                    return Vec::new();
                }
                self.selection_enabled = enabled;
                if !enabled {
                    self.interaction.reset();
                }

                let mut effects = vec![Effect::Repaint];
                self.push_cursor(&mut effects);
                effects
            }

            Action::SetSelection { selection } => {
                let handle = self.selection.set_source_selection(
                    selection,
                    self.interaction.active_handle(),
                    self.scaling.as_ref(),
                );

                if selection.is_none() {
                    self.interaction.reset();
                } else {
                    self.interaction.set_active_handle(handle);
                }

                self.selection_edited()
            }

            Action::MouseDown { x, y } => {
                let point = Point::from((x, y));
                self.pointer = Some(point);
                if !self.selection_enabled || self.scaling.is_none() {
                    return Vec::new();
                }

                let display = self.selection.display();
                let hit = hit_test(point, display.as_ref(), self.handle_size);

                match self.interaction.press(point, hit, display.as_ref()) {
                    Ok(mode) => {
                        debug!(?mode, ?hit, x, y, "Selection gesture started");
                        let mut effects = Vec::new();
                        self.push_cursor(&mut effects);
                        effects
                    }
                    Err(e) => {
                        warn!("Ignoring pointer press: {e}");
                        Vec::new()
                    }
                }
            }

            Action::MouseMove { x, y } => {
                let point = Point::from((x, y));
                self.pointer = Some(point);
                if !self.selection_enabled {
                    return Vec::new();
                }

                let mut effects = Vec::new();

                if self.interaction.is_idle() {
                    self.hover = hit_test(
                        point,
                        self.selection.display().as_ref(),
                        self.handle_size,
                    );
                    self.push_cursor(&mut effects);
                    return effects;
                }

                let display = self.selection.display();
                let Some(proposed) = self.interaction.drag(point, display.as_ref()) else {
                    return effects;
                };

                match self.selection.set_display_selection(
                    proposed,
                    self.interaction.active_handle(),
                    self.scaling.as_ref(),
                ) {
                    Ok(handle) => {
                        self.interaction.set_active_handle(handle);
                        trace!(?proposed, selection = ?self.selection.source(), "Selection dragged");
                        effects.push(Effect::SelectionChanged {
                            selection: self.selection.source(),
                        });
                        effects.push(Effect::Repaint);
                    }
                    Err(e) => warn!("Dropping drag update: {e}"),
                }

                self.push_cursor(&mut effects);
                effects
            }

            Action::MouseUp { x, y } => {
                let point = Point::from((x, y));
                self.pointer = Some(point);
                let mode = self.interaction.release();
                if !mode.is_active() {
                    return Vec::new();
                }

                debug!(?mode, selection = ?self.selection.source(), "Selection gesture ended");

                self.hover = hit_test(point, self.selection.display().as_ref(), self.handle_size);

                let mut effects = vec![Effect::Repaint];
                self.push_cursor(&mut effects);
                effects
            }
        }
    }

    /// Replace the selection from display-space coordinates.
    ///
    /// Unlike pointer drags this reports a missing mapping to the caller; the
    /// model is unchanged on error.
    pub fn set_display_selection(&mut self, rect: Rect) -> Result<Vec<Effect>, SelectionError> {
        let handle = self.selection.set_display_selection(
            rect,
            self.interaction.active_handle(),
            self.scaling.as_ref(),
        )?;
        self.interaction.set_active_handle(handle);
        Ok(self.selection_edited())
    }

    /// Effects for a selection replaced outside a drag, refreshing hover feedback.
    fn selection_edited(&mut self) -> Vec<Effect> {
        self.hover = match self.pointer {
            Some(point) => hit_test(point, self.selection.display().as_ref(), self.handle_size),
            None => HitResult::Outside,
        };

        let mut effects = vec![
            Effect::SelectionChanged {
                selection: self.selection.source(),
            },
            Effect::Repaint,
        ];
        self.push_cursor(&mut effects);
        effects
    }

    /// Recompute scaling from the current extents and re-project the selection.
    fn recompute_scaling(&mut self) -> Vec<Effect> {
        let (Some(source), Some(destination)) = (self.source_extent, self.destination_extent)
        else {
            return Vec::new();
        };

        match recompute(source, destination) {
            Ok(scaling) => {
                debug!(
                    ?source,
                    ?destination,
                    scaled_width = scaling.scaled_width,
                    scaled_height = scaling.scaled_height,
                    "Recomputed scaling"
                );
                self.scaling = Some(scaling);
                self.selection.reproject(&scaling);
            }
            Err(e) => {
                if self.scaling.is_some() {
                    warn!("Mapping unavailable: {e}");
                }
                self.scaling = None;
                self.selection.invalidate();
                // A gesture cannot continue without a mapping.
                self.interaction.reset();
            }
        }

        vec![Effect::ScalingChanged(self.scaling), Effect::Repaint]
    }

    fn push_cursor(&mut self, effects: &mut Vec<Effect>) {
        let cursor = cursor_for(&CursorContext {
            selection_enabled: self.selection_enabled,
            mode: self.interaction.mode(),
            active_handle: self.interaction.active_handle(),
            has_selection: self.selection.display().is_some(),
            hover: self.hover,
        });

        if cursor != self.cursor {
            self.cursor = cursor;
            effects.push(Effect::SetCursor(cursor));
        }
    }
}
