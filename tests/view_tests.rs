// Camera view integration tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use tokio::runtime::Handle;

use camview::{
    Camera, CameraView, CursorIcon, Extent, Frame, FrameListener, LengthUnit, Rect,
    RepaintRequester, SelectionMode, Settings, UnitsPerPixel, ViewError,
};

#[derive(Default)]
struct RecordingHost {
    repaints: AtomicUsize,
    cursors: Mutex<Vec<CursorIcon>>,
    selections: Mutex<Vec<Option<Rect>>>,
}

impl RecordingHost {
    fn repaints(&self) -> usize {
        self.repaints.load(Ordering::SeqCst)
    }
}

impl RepaintRequester for RecordingHost {
    fn request_repaint(&self) {
        self.repaints.fetch_add(1, Ordering::SeqCst);
    }

    fn set_cursor(&self, cursor: CursorIcon) {
        self.cursors.lock().push(cursor);
    }

    fn selection_changed(&self, selection: Option<Rect>) {
        self.selections.lock().push(selection);
    }
}

struct FakeCamera {
    units_per_pixel: UnitsPerPixel,
    listeners: Mutex<Vec<Arc<dyn FrameListener>>>,
    starts: Mutex<Vec<u32>>,
    stops: AtomicUsize,
}

impl FakeCamera {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            units_per_pixel: UnitsPerPixel::new(0.5, 0.5, LengthUnit::Millimeters),
            listeners: Mutex::new(Vec::new()),
            starts: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
        })
    }

    fn push(&self, frame: Frame) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.frame_received(frame.clone());
        }
    }

    fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl Camera for FakeCamera {
    fn units_per_pixel(&self) -> UnitsPerPixel {
        self.units_per_pixel
    }

    fn start_continuous_capture(&self, listener: Arc<dyn FrameListener>, maximum_fps: u32) {
        self.listeners.lock().push(listener);
        self.starts.lock().push(maximum_fps);
    }

    fn stop_continuous_capture(&self, listener: &Arc<dyn FrameListener>) {
        self.listeners.lock().retain(|l| !Arc::ptr_eq(l, listener));
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

fn frame(width: u32, height: u32) -> Frame {
    Frame::new(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255])
    }))
}

fn fast_settings() -> Settings {
    Settings {
        dash_tick_ms: 5,
        flash_tick_ms: 1,
        flash_decay: 0.5,
        ..Settings::default()
    }
}

fn view_with(settings: &Settings) -> (CameraView, Arc<RecordingHost>, Arc<FakeCamera>) {
    let host = Arc::new(RecordingHost::default());
    let view = CameraView::new(settings, host.clone(), Handle::current());
    let camera = FakeCamera::new();
    view.resized(Extent::new(800, 600));
    view.set_camera(Some(camera.clone()));
    (view, host, camera)
}

#[tokio::test]
async fn frames_drive_scaling() {
    let (view, host, camera) = view_with(&fast_settings());
    assert!(view.scaling().is_none());

    let before = host.repaints();
    camera.push(frame(1600, 1200));

    assert_eq!(view.scale_ratio(), Some((2.0, 2.0)));
    assert!(view.snapshot().frame.is_some());
    assert!(host.repaints() > before);

    assert_eq!(
        view.scaled_units_per_pixel(),
        Some(UnitsPerPixel::new(1.0, 1.0, LengthUnit::Millimeters))
    );
}

#[tokio::test]
async fn drag_creates_selection_in_source_space() {
    let (view, host, camera) = view_with(&fast_settings());
    camera.push(frame(1600, 1200));

    view.mouse_pressed(100, 100);
    assert_eq!(view.mode(), SelectionMode::Creating);
    view.mouse_moved(50, 60);
    view.mouse_released(50, 60);

    assert_eq!(view.mode(), SelectionMode::None);
    assert_eq!(view.selection(), Some(Rect::new(100.0, 120.0, 100.0, 80.0)));
    assert_eq!(view.display_selection(), Some(Rect::new(50.0, 60.0, 50.0, 40.0)));
    assert_eq!(
        host.selections.lock().last().copied(),
        Some(Some(Rect::new(100.0, 120.0, 100.0, 80.0)))
    );
    assert!(host.cursors.lock().contains(&CursorIcon::Crosshair));
}

#[tokio::test]
async fn selection_set_before_first_frame_is_projected_later() {
    let (view, _host, camera) = view_with(&fast_settings());

    view.set_selection(Some(Rect::new(200.0, 200.0, 400.0, 300.0)));
    assert_eq!(view.display_selection(), None);

    camera.push(frame(1600, 1200));
    assert_eq!(view.display_selection(), Some(Rect::new(100.0, 100.0, 200.0, 150.0)));

    view.resized(Extent::new(400, 300));
    assert_eq!(view.display_selection(), Some(Rect::new(50.0, 50.0, 100.0, 75.0)));
    assert_eq!(view.selection(), Some(Rect::new(200.0, 200.0, 400.0, 300.0)));
}

#[tokio::test]
async fn set_camera_swaps_capture() {
    let (view, _host, first) = view_with(&fast_settings());
    assert_eq!(*first.starts.lock(), vec![24]);

    let second = FakeCamera::new();
    view.set_camera(Some(second.clone()));
    assert_eq!(first.stops(), 1);
    assert!(first.listeners.lock().is_empty());
    assert_eq!(*second.starts.lock(), vec![24]);

    view.set_maximum_fps(10);
    assert_eq!(second.stops(), 1);
    assert_eq!(*second.starts.lock(), vec![24, 10]);

    view.set_maximum_fps(10);
    assert_eq!(second.stops(), 1);
    assert_eq!(view.maximum_fps(), 10);

    drop(view);
    assert_eq!(second.stops(), 2);
    assert!(second.listeners.lock().is_empty());
}

#[tokio::test]
async fn snapshot_carries_selection_text() {
    let (view, _host, camera) = view_with(&fast_settings());
    camera.push(frame(1600, 1200));
    view.set_selection(Some(Rect::new(0.0, 0.0, 100.0, 50.0)));

    let snapshot = view.snapshot();
    assert_eq!(
        snapshot.selection_text.as_deref(),
        Some("100px, 50px\n50.000mm, 25.000mm")
    );
    assert_eq!(snapshot.image_rect(), Some(Rect::new(0.0, 0.0, 800.0, 600.0)));

    view.set_text_delegate(None);
    assert_eq!(view.snapshot().selection_text, None);
}

#[tokio::test]
async fn capture_crops_selection_and_fades_flash() {
    let (view, host, camera) = view_with(&fast_settings());
    camera.push(frame(1600, 1200));
    view.set_selection(Some(Rect::new(10.0, 20.0, 30.0, 40.0)));

    let before = host.repaints();
    let image = view.capture_selection_image().await.unwrap();

    assert_eq!(image.dimensions(), (30, 40));
    assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 7, 255]));
    assert_eq!(view.snapshot().flash_opacity, 0.0);
    // Flash start plus one repaint per fade step.
    assert!(host.repaints() >= before + 3);
}

#[tokio::test]
async fn capture_reports_missing_inputs() {
    let (view, _host, camera) = view_with(&fast_settings());

    let err = view.capture_selection_image().await.unwrap_err();
    assert!(matches!(err, ViewError::NoSelection));

    view.set_selection(Some(Rect::new(200.0, 200.0, 10.0, 10.0)));
    let err = view.capture_selection_image().await.unwrap_err();
    assert!(matches!(err, ViewError::NoFrame));

    camera.push(frame(100, 100));
    let err = view.capture_selection_image().await.unwrap_err();
    assert!(matches!(err, ViewError::CaptureOutOfBounds { .. }));
}

#[tokio::test]
async fn save_selection_image_writes_file() {
    let (view, _host, camera) = view_with(&fast_settings());
    camera.push(frame(64, 64));
    view.set_selection(Some(Rect::new(0.0, 0.0, 16.0, 8.0)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("captures").join("selection.png");
    view.save_selection_image(&path).await.unwrap();

    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (16, 8));
}

#[tokio::test]
async fn dash_ticker_repaints_only_with_active_selection() {
    let (view, host, _camera) = view_with(&fast_settings());

    let before = host.repaints();
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(host.repaints(), before);

    view.set_selection(Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    let before = host.repaints();
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert!(host.repaints() > before);

    view.set_selection_enabled(false);
    let before = host.repaints();
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(host.repaints(), before);
}

#[tokio::test]
async fn disabled_selection_ignores_pointer() {
    let settings = Settings {
        selection_enabled: false,
        ..fast_settings()
    };
    let (view, host, camera) = view_with(&settings);
    camera.push(frame(800, 600));

    view.mouse_pressed(10, 10);
    view.mouse_moved(100, 100);
    view.mouse_released(100, 100);

    assert_eq!(view.selection(), None);
    assert_eq!(view.mode(), SelectionMode::None);
    assert_eq!(view.cursor(), CursorIcon::Default);
    assert!(host.cursors.lock().is_empty());
    assert!(!view.is_selection_enabled());
}

#[tokio::test]
async fn display_selection_requires_a_frame() {
    let (view, host, camera) = view_with(&fast_settings());

    let err = view
        .set_display_selection(Rect::new(0.0, 0.0, 10.0, 10.0))
        .unwrap_err();
    assert!(matches!(err, ViewError::Selection(_)));
    assert_eq!(view.selection(), None);

    camera.push(frame(1600, 1200));
    view.set_display_selection(Rect::new(50.0, 60.0, 50.0, 40.0)).unwrap();
    assert_eq!(view.selection(), Some(Rect::new(100.0, 120.0, 100.0, 80.0)));
    assert_eq!(
        host.selections.lock().last().copied(),
        Some(Some(Rect::new(100.0, 120.0, 100.0, 80.0)))
    );
}

#[tokio::test]
async fn frames_from_another_thread_keep_selection_pair_matched() {
    let (view, _host, camera) = view_with(&fast_settings());
    camera.push(frame(160, 120));

    let producer = {
        let camera = Arc::clone(&camera);
        std::thread::spawn(move || {
            for i in 0..300 {
                let (w, h) = if i % 2 == 0 { (320, 240) } else { (200, 100) };
                camera.push(frame(w, h));
            }
        })
    };

    let mut checked = 0;
    while !producer.is_finished() || checked < 50 {
        let step = (checked % 200) as i32;
        view.mouse_pressed(100, 100);
        view.mouse_moved(150 + step, 120 + step / 2);
        view.mouse_released(150 + step, 120 + step / 2);

        let snapshot = view.snapshot();
        match (snapshot.scaling, snapshot.source_selection) {
            (Some(scaling), Some(source)) => {
                assert_eq!(snapshot.selection, Some(scaling.to_display(&source)));
            }
            _ => assert_eq!(snapshot.selection, None),
        }

        view.set_selection(None);
        checked += 1;
    }

    producer.join().unwrap();
    assert!(checked >= 50);
}
