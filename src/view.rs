//! Camera view: binds a camera, keeps the latest frame, and runs the selection
//! core against host pointer and resize events.
//!
//! All model state lives behind one mutex. Every entry point locks it, reduces
//! one action, releases it, and only then talks to the host.

use std::path::Path;
use std::sync::{Arc, Weak};
use std::time::Duration;

use image::RgbaImage;
use image::imageops;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use cv_core::{Action, CursorIcon, Effect, SelectionMode, ViewModel};
use cv_geometry::{Extent, HandlePosition, Rect, ScalingState};
use cv_settings::Settings;

use crate::animation::{DashAnimation, FlashAnimation};
use crate::camera::{Camera, Frame, FrameListener};
use crate::error::{ViewError, ViewResult};
use crate::units::{PixelsAndUnitsText, SelectionTextDelegate, UnitsPerPixel};

/// Host surface callbacks. Always invoked without the view lock held.
pub trait RepaintRequester: Send + Sync {
    fn request_repaint(&self);

    fn set_cursor(&self, _cursor: CursorIcon) {}

    /// Source-space selection after an edit; `None` once cleared.
    fn selection_changed(&self, _selection: Option<Rect>) {}
}

/// Everything a renderer needs for one paint, copied out under the lock.
#[derive(Debug, Clone)]
pub struct PaintSnapshot {
    pub frame: Option<Frame>,
    pub scaling: Option<ScalingState>,
    /// Display-space selection; `None` without a selection or a mapping.
    pub selection: Option<Rect>,
    /// The same selection in source pixels.
    pub source_selection: Option<Rect>,
    pub selection_enabled: bool,
    pub mode: SelectionMode,
    pub active_handle: Option<HandlePosition>,
    pub handle_size: f64,
    pub dash_phase: f32,
    pub flash_opacity: f32,
    pub selection_text: Option<String>,
}

impl PaintSnapshot {
    /// Where the scaled frame lands on the surface.
    pub fn image_rect(&self) -> Option<Rect> {
        self.scaling.as_ref().map(ScalingState::image_rect)
    }
}

struct ViewState {
    model: ViewModel,
    last_frame: Option<Frame>,
    dash: DashAnimation,
    flash: FlashAnimation,
    units_per_pixel: UnitsPerPixel,
    text_delegate: Option<Arc<dyn SelectionTextDelegate>>,
}

struct Shared {
    state: Mutex<ViewState>,
    host: Arc<dyn RepaintRequester>,
}

impl Shared {
    fn dispatch(&self, action: Action) {
        let effects = self.state.lock().model.reduce(action);
        self.apply(&effects, false);
    }

    fn apply(&self, effects: &[Effect], force_repaint: bool) {
        let mut repaint = force_repaint;
        for effect in effects {
            match effect {
                Effect::Repaint => repaint = true,
                Effect::SetCursor(cursor) => self.host.set_cursor(*cursor),
                Effect::SelectionChanged { selection } => self.host.selection_changed(*selection),
                Effect::ScalingChanged(scaling) => match scaling {
                    Some(s) => debug!(
                        ratio_x = s.scale_ratio_x,
                        ratio_y = s.scale_ratio_y,
                        "Scaling changed"
                    ),
                    None => debug!("Scaling unavailable"),
                },
            }
        }
        if repaint {
            self.host.request_repaint();
        }
    }

    fn tick_dash(&self) {
        let ticked = {
            let mut state = self.state.lock();
            if state.model.selection_enabled() && state.model.selection().has_selection() {
                state.dash.tick();
                true
            } else {
                false
            }
        };

        if ticked {
            self.host.request_repaint();
        }
    }
}

impl FrameListener for Shared {
    fn frame_received(&self, frame: Frame) {
        let extent = frame.extent();
        let effects = {
            let mut state = self.state.lock();
            state.last_frame = Some(frame);
            state.model.reduce(Action::SourceResized { extent })
        };
        self.apply(&effects, true);
    }
}

struct CameraBinding {
    camera: Option<Arc<dyn Camera>>,
    maximum_fps: u32,
}

pub struct CameraView {
    shared: Arc<Shared>,
    listener: Arc<dyn FrameListener>,
    binding: Mutex<CameraBinding>,
    runtime: Handle,
    ticker: JoinHandle<()>,
    flash_tick: Duration,
}

impl CameraView {
    /// Create a view and start its marching-ants ticker on `runtime`.
    pub fn new(settings: &Settings, host: Arc<dyn RepaintRequester>, runtime: Handle) -> Self {
        let state = ViewState {
            model: ViewModel::new(settings.selection_enabled, settings.handle_size),
            last_frame: None,
            dash: DashAnimation::new(settings.dash_phase_start),
            flash: FlashAnimation::new(settings.flash_decay),
            units_per_pixel: UnitsPerPixel::default(),
            text_delegate: Some(Arc::new(PixelsAndUnitsText)),
        };
        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            host,
        });
        let listener: Arc<dyn FrameListener> = shared.clone();
        let ticker = runtime.spawn(run_dash_ticker(Arc::downgrade(&shared), settings.dash_tick()));

        Self {
            shared,
            listener,
            binding: Mutex::new(CameraBinding {
                camera: None,
                maximum_fps: settings.maximum_fps,
            }),
            runtime,
            ticker,
            flash_tick: settings.flash_tick(),
        }
    }

    /// Listener that feeds frames into this view.
    pub fn frame_listener(&self) -> Arc<dyn FrameListener> {
        Arc::clone(&self.listener)
    }

    /// The host surface changed size.
    pub fn resized(&self, extent: Extent) {
        self.shared.dispatch(Action::SurfaceResized { extent });
    }

    pub fn mouse_pressed(&self, x: i32, y: i32) {
        self.shared.dispatch(Action::MouseDown { x, y });
    }

    pub fn mouse_moved(&self, x: i32, y: i32) {
        self.shared.dispatch(Action::MouseMove { x, y });
    }

    pub fn mouse_released(&self, x: i32, y: i32) {
        self.shared.dispatch(Action::MouseUp { x, y });
    }

    /// Replace the selection, in source pixels. `None` clears it.
    pub fn set_selection(&self, selection: Option<Rect>) {
        self.shared.dispatch(Action::SetSelection { selection });
    }

    /// Replace the selection from surface coordinates.
    ///
    /// Fails while no mapping exists (no frame yet, or a zero-sized surface).
    pub fn set_display_selection(&self, rect: Rect) -> ViewResult<()> {
        let effects = self.shared.state.lock().model.set_display_selection(rect)?;
        self.shared.apply(&effects, false);
        Ok(())
    }

    /// Current selection, in source pixels.
    pub fn selection(&self) -> Option<Rect> {
        self.shared.state.lock().model.source_selection()
    }

    pub fn display_selection(&self) -> Option<Rect> {
        self.shared.state.lock().model.display_selection()
    }

    pub fn set_selection_enabled(&self, enabled: bool) {
        self.shared.dispatch(Action::SetSelectionEnabled { enabled });
    }

    pub fn is_selection_enabled(&self) -> bool {
        self.shared.state.lock().model.selection_enabled()
    }

    pub fn mode(&self) -> SelectionMode {
        self.shared.state.lock().model.mode()
    }

    pub fn cursor(&self) -> CursorIcon {
        self.shared.state.lock().model.cursor()
    }

    pub fn scaling(&self) -> Option<ScalingState> {
        self.shared.state.lock().model.scaling().copied()
    }

    /// Source pixels per display pixel, per axis.
    pub fn scale_ratio(&self) -> Option<(f64, f64)> {
        self.scaling().map(|s| (s.scale_ratio_x, s.scale_ratio_y))
    }

    /// Physical size of one display pixel.
    pub fn scaled_units_per_pixel(&self) -> Option<UnitsPerPixel> {
        let state = self.shared.state.lock();
        state
            .model
            .scaling()
            .map(|s| state.units_per_pixel.scaled(s))
    }

    pub fn set_text_delegate(&self, delegate: Option<Arc<dyn SelectionTextDelegate>>) {
        self.shared.state.lock().text_delegate = delegate;
        self.shared.host.request_repaint();
    }

    /// Bind `camera`, stopping capture on the previously bound one.
    ///
    /// The last frame is dropped; the scaling stays until the new camera
    /// delivers a frame of a different size.
    pub fn set_camera(&self, camera: Option<Arc<dyn Camera>>) {
        let mut binding = self.binding.lock();
        if let Some(previous) = binding.camera.take() {
            previous.stop_continuous_capture(&self.listener);
        }

        let units_per_pixel = camera
            .as_ref()
            .map(|c| c.units_per_pixel())
            .unwrap_or_default();
        {
            let mut state = self.shared.state.lock();
            state.units_per_pixel = units_per_pixel;
            state.last_frame = None;
        }

        if let Some(camera) = &camera {
            info!(maximum_fps = binding.maximum_fps, "Starting camera capture");
            camera.start_continuous_capture(Arc::clone(&self.listener), binding.maximum_fps);
        }
        binding.camera = camera;
        drop(binding);

        self.shared.host.request_repaint();
    }

    pub fn camera(&self) -> Option<Arc<dyn Camera>> {
        self.binding.lock().camera.clone()
    }

    /// Change the capture rate, restarting capture on the bound camera.
    pub fn set_maximum_fps(&self, maximum_fps: u32) {
        let mut binding = self.binding.lock();
        if binding.maximum_fps == maximum_fps {
            return;
        }
        binding.maximum_fps = maximum_fps;

        if let Some(camera) = &binding.camera {
            debug!(maximum_fps, "Restarting camera capture");
            camera.stop_continuous_capture(&self.listener);
            camera.start_continuous_capture(Arc::clone(&self.listener), maximum_fps);
        }
    }

    pub fn maximum_fps(&self) -> u32 {
        self.binding.lock().maximum_fps
    }

    pub fn snapshot(&self) -> PaintSnapshot {
        let (mut snapshot, label) = {
            let state = self.shared.state.lock();
            let model = &state.model;
            let snapshot = PaintSnapshot {
                frame: state.last_frame.clone(),
                scaling: model.scaling().copied(),
                selection: model.display_selection(),
                source_selection: model.source_selection(),
                selection_enabled: model.selection_enabled(),
                mode: model.mode(),
                active_handle: model.active_handle(),
                handle_size: model.handle_size(),
                dash_phase: state.dash.phase(),
                flash_opacity: state.flash.opacity(),
                selection_text: None,
            };

            let label = match (state.text_delegate.clone(), model.source_selection()) {
                (Some(delegate), Some(selection))
                    if model.selection_enabled() && model.display_selection().is_some() =>
                {
                    Some((delegate, selection, state.units_per_pixel))
                }
                _ => None,
            };
            (snapshot, label)
        };

        snapshot.selection_text =
            label.map(|(delegate, selection, upp)| delegate.selection_text(&selection, &upp));
        snapshot
    }

    /// Crop the selection out of the latest frame and flash the view.
    ///
    /// Returns once the flash has faded out. A selection partially outside the
    /// frame is clamped to it.
    pub async fn capture_selection_image(&self) -> ViewResult<RgbaImage> {
        let (frame, selection) = {
            let state = self.shared.state.lock();
            let selection = state
                .model
                .source_selection()
                .ok_or(ViewError::NoSelection)?;
            let frame = state.last_frame.clone().ok_or(ViewError::NoFrame)?;
            (frame, selection)
        };

        let image = crop_to_frame(&frame, &selection)?;
        info!(
            width = image.width(),
            height = image.height(),
            "Captured selection image"
        );

        self.flash().await?;
        Ok(image)
    }

    /// Capture the selection and write it to `path`; the format follows the extension.
    pub async fn save_selection_image(&self, path: impl AsRef<Path>) -> ViewResult<RgbaImage> {
        let image = self.capture_selection_image().await?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        image.save(path)?;
        info!("Saved selection image to {}", path.display());
        Ok(image)
    }

    async fn flash(&self) -> ViewResult<()> {
        self.shared.state.lock().flash.start();
        self.shared.host.request_repaint();

        let shared = Arc::clone(&self.shared);
        let period = self.flash_tick;
        let task = self.runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let visible = shared.state.lock().flash.step();
                shared.host.request_repaint();
                if !visible {
                    break;
                }
            }
        });

        task.await?;
        Ok(())
    }
}

impl Drop for CameraView {
    fn drop(&mut self) {
        self.ticker.abort();
        if let Some(camera) = self.binding.get_mut().camera.take() {
            camera.stop_continuous_capture(&self.listener);
        }
    }
}

async fn run_dash_ticker(shared: Weak<Shared>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        shared.tick_dash();
    }
}

/// Crop `selection` (source pixels) out of `frame`, clamped to the frame bounds.
fn crop_to_frame(frame: &Frame, selection: &Rect) -> ViewResult<RgbaImage> {
    let extent = frame.extent();
    let left = selection.x.max(0.0);
    let top = selection.y.max(0.0);
    let right = selection.right().min(f64::from(extent.width));
    let bottom = selection.bottom().min(f64::from(extent.height));

    if right <= left || bottom <= top {
        return Err(ViewError::CaptureOutOfBounds {
            selection: *selection,
            frame: extent,
        });
    }

    let (x, y) = (left as u32, top as u32);
    let (width, height) = ((right - left) as u32, (bottom - top) as u32);
    Ok(imageops::crop_imm(frame.image(), x, y, width, height).to_image())
}
