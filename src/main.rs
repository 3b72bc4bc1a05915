use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{info, warn};

use camview::{
    Camera, CameraView, ConfigManager, CursorIcon, Extent, Frame, FrameListener, LengthUnit,
    Rect, RepaintRequester, UnitsPerPixel,
};

/// Gradient test pattern delivered from a background thread.
struct SyntheticCamera {
    width: u32,
    height: u32,
    streams: Mutex<Vec<(Arc<dyn FrameListener>, Arc<AtomicBool>)>>,
}

impl SyntheticCamera {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            streams: Mutex::new(Vec::new()),
        }
    }

    fn render(width: u32, height: u32, seq: u32) -> Frame {
        Frame::new(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                (seq % 256) as u8,
                255,
            ])
        }))
    }
}

impl Camera for SyntheticCamera {
    fn units_per_pixel(&self) -> UnitsPerPixel {
        UnitsPerPixel::new(0.0254, 0.0254, LengthUnit::Millimeters)
    }

    fn start_continuous_capture(&self, listener: Arc<dyn FrameListener>, maximum_fps: u32) {
        let running = Arc::new(AtomicBool::new(true));
        self.streams
            .lock()
            .push((Arc::clone(&listener), Arc::clone(&running)));

        // First frame synchronously so the view has a size right away.
        listener.frame_received(Self::render(self.width, self.height, 0));

        let (width, height) = (self.width, self.height);
        let period = Duration::from_secs_f64(1.0 / f64::from(maximum_fps.max(1)));
        thread::spawn(move || {
            let mut seq = 1;
            while running.load(Ordering::Relaxed) {
                thread::sleep(period);
                listener.frame_received(Self::render(width, height, seq));
                seq = seq.wrapping_add(1);
            }
        });
    }

    fn stop_continuous_capture(&self, listener: &Arc<dyn FrameListener>) {
        self.streams.lock().retain(|(l, running)| {
            if Arc::ptr_eq(l, listener) {
                running.store(false, Ordering::Relaxed);
                false
            } else {
                true
            }
        });
    }
}

struct LogHost;

impl RepaintRequester for LogHost {
    fn request_repaint(&self) {}

    fn set_cursor(&self, cursor: CursorIcon) {
        info!(?cursor, "Cursor");
    }

    fn selection_changed(&self, selection: Option<Rect>) {
        tracing::debug!(?selection, "Selection changed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    camview::logging::init();

    let config = ConfigManager::new();
    info!("Using settings from {}", config.path().display());
    let settings = config.get();

    let view = CameraView::new(&settings, Arc::new(LogHost), Handle::current());
    view.resized(Extent::new(800, 600));
    view.set_camera(Some(Arc::new(SyntheticCamera::new(1280, 720))));

    // Drag out a selection, then grab it by its south-east corner.
    view.mouse_pressed(200, 150);
    view.mouse_moved(300, 250);
    view.mouse_moved(500, 400);
    view.mouse_released(500, 400);

    if let Some(display) = view.display_selection() {
        let (x, y) = (display.right() as i32, display.bottom() as i32);
        view.mouse_pressed(x, y);
        view.mouse_moved(x + 40, y + 20);
        view.mouse_released(x + 40, y + 20);
    }

    let Some(selection) = view.selection() else {
        warn!("Selection is disabled; nothing to capture");
        return Ok(());
    };
    info!(?selection, "Selection in camera pixels");

    if let Some(text) = view.snapshot().selection_text {
        info!("Selection text:\n{text}");
    }

    let image = view.capture_selection_image().await?;
    info!(
        width = image.width(),
        height = image.height(),
        "Captured selection"
    );

    view.set_camera(None);
    Ok(())
}
