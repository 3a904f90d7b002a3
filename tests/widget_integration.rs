use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine;
use fillview::config::{Capabilities, Settings, SettingsUpdate};
use fillview::lifecycle::Hooks;
use fillview::placement::{Focus, ImageMetrics, Placement, Viewport};
use fillview::strategy::Surface;
use fillview::widget::{Widget, WidgetEvent};

// PNG 1x1, base64 encoded
const ONE_BY_ONE_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

// JPEG 2x1 with EXIF orientation 6, base64 encoded
const TWO_BY_ONE_JPEG: &str = concat!(
    "/9j/4AAQSkZJRgABAQAAAQABAAD/4QAiRXhpZgAATU0AKgAAAAgAAQESAAMAAAABAAYAAAAAAAD/2wBDAAgGBgcGBQgHBwcJCQgKDBQNDAsLDBkSEw8UHRofHh0aHBwgJC4nICIsIxwcKDcpLDAxNDQ0Hyc5PTgyPC4zNDL/",
    "2wBDAQkJCQwLDBgNDRgyIRwhMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjIyMjL/wAARCAABAAIDASIAAhEBAxEB/8QAHwAAAQUBAQEBAQEAAAAAAAAAAAECAwQFBgcICQoL/8QAtRAAAgEDAwIEAwUFBAQAAAF9AQIDAAQRBRIhMUEGE1FhByJxFDKBkaEII0KxwRVS0fAkM2JyggkKFhcYGRolJicoKSo0NTY3ODk6Q0RFRkdISUpTVFVWV1hZWmNkZWZnaGlqc3R1dnd4eXqDhIWGh4iJipKTlJWWl5iZmqKjpKWmp6ipqrKztLW2t7i5usLDxMXGx8jJytLT1NXW19jZ2uHi4+Tl5ufo6erx8vP09fb3+Pn6/8QAHwEAAwEBAQEBAQEBAQAAAAAAAAECAwQFBgcICQoL/8QAtREAAgECBAQDBAcFBAQAAQJ3AAECAxEEBSExBhJBUQdhcRMiMoEIFEKRobHBCSMzUvAVYnLRChYkNOEl8RcYGRomJygpKjU2Nzg5OkNERUZHSElKU1RVVldYWVpjZGVmZ2hpanN0dXZ3eHl6goOEhYaHiImKkpOUlZaXmJmaoqOkpaanqKmqsrO0tba3uLm6wsPExcbHyMnK0tPU1dbX2Nna4uPk5ebn6Onq8vP09fb3+Pn6/9oADAMBAAIRAxEAPwDi6KKK+ZP3E//Z"
);

#[derive(Default)]
struct Recording {
    sources: Vec<String>,
    placements: Vec<Placement>,
    released: usize,
}

struct RecordingSurface {
    viewport: Arc<Mutex<Viewport>>,
    recording: Arc<Mutex<Recording>>,
}

impl Surface for RecordingSurface {
    fn apply_image_source(&mut self, src: &str) {
        self.recording.lock().unwrap().sources.push(src.to_owned());
    }

    fn apply_placement(&mut self, placement: Placement) {
        self.recording.lock().unwrap().placements.push(placement);
    }

    fn set_focus_anchor(&mut self, _focus: Focus) {}

    fn viewport(&self) -> Viewport {
        *self.viewport.lock().unwrap()
    }

    fn release(&mut self) {
        self.recording.lock().unwrap().released += 1;
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    widget: Widget,
    viewport: Arc<Mutex<Viewport>>,
    recording: Arc<Mutex<Recording>>,
    png_src: String,
    jpeg_src: String,
}

fn fixture_with(settings: Settings) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let decode = |b64: &str| {
        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .unwrap()
    };
    let png_path = dir.path().join("pixel.png");
    std::fs::write(&png_path, decode(ONE_BY_ONE_PNG)).unwrap();
    let jpeg_path = dir.path().join("wide.jpg");
    std::fs::write(&jpeg_path, decode(TWO_BY_ONE_JPEG)).unwrap();

    let viewport = Arc::new(Mutex::new(Viewport::new(500.0, 600.0)));
    let recording = Arc::new(Mutex::new(Recording::default()));
    let surface = RecordingSurface {
        viewport: Arc::clone(&viewport),
        recording: Arc::clone(&recording),
    };

    let widget = Widget::new(
        settings,
        Hooks::default(),
        Capabilities::default(),
        Box::new(surface),
    );

    Fixture {
        png_src: png_path.to_string_lossy().into_owned(),
        jpeg_src: jpeg_path.to_string_lossy().into_owned(),
        _dir: dir,
        widget,
        viewport,
        recording,
    }
}

fn fixture() -> Fixture {
    fixture_with(Settings::default())
}

async fn drive_until_visible(widget: &mut Widget) {
    loop {
        match widget.drive().await {
            Some(WidgetEvent::Visible) => break,
            Some(WidgetEvent::Loaded) => continue,
            None => panic!("widget stopped before becoming visible"),
        }
    }
}

#[tokio::test]
async fn show_loads_paints_and_fades_in() {
    let mut fx = fixture();
    let src = fx.png_src.clone();

    fx.widget.show(&src).await;
    assert!(!fx.widget.image_is_loaded());
    assert!(!fx.widget.image_is_visible());

    drive_until_visible(&mut fx.widget).await;

    assert!(fx.widget.image_is_loaded());
    assert!(fx.widget.image_is_visible());
    assert_eq!(
        fx.widget.image_size(),
        Some(ImageMetrics {
            width: 1,
            height: 1
        })
    );
    assert_eq!(fx.widget.src(), Some(src.as_str()));

    let recording = fx.recording.lock().unwrap();
    assert_eq!(recording.sources, vec![src]);
    assert_eq!(recording.placements.len(), 1);
    let placement = recording.placements[0];
    assert!(placement.stretched_width >= 500.0);
    assert!(placement.stretched_height >= 600.0);
}

#[tokio::test]
async fn superseded_load_never_becomes_visible() {
    let mut fx = fixture();
    let first = fx.png_src.clone();
    let second = fx.jpeg_src.clone();

    fx.widget.show(&first).await;
    fx.widget.show(&second).await;

    drive_until_visible(&mut fx.widget).await;

    // Only the second request is reflected, whatever order the two loads
    // completed in.
    assert_eq!(fx.widget.src(), Some(second.as_str()));
    assert_eq!(
        fx.widget.image_size(),
        Some(ImageMetrics {
            width: 2,
            height: 1
        })
    );
    let recording = fx.recording.lock().unwrap();
    assert_eq!(recording.sources, vec![second]);
}

#[tokio::test]
async fn load_failure_fades_in_without_a_size() {
    let mut fx = fixture();
    let missing = format!("{}.does-not-exist.png", fx.png_src);

    fx.widget.show(&missing).await;
    drive_until_visible(&mut fx.widget).await;

    assert!(fx.widget.image_is_visible());
    assert_eq!(fx.widget.image_size(), None);
    assert_eq!(fx.widget.viewable_area(), None);
    // The source is still painted; there is just no placement to apply.
    let recording = fx.recording.lock().unwrap();
    assert_eq!(recording.sources, vec![missing]);
    assert!(recording.placements.is_empty());
}

#[tokio::test]
async fn timed_fade_reports_loaded_before_visible() {
    let settings = Settings {
        speed: Duration::from_millis(20),
        ..Settings::default()
    };
    let mut fx = fixture_with(settings);
    let src = fx.png_src.clone();

    fx.widget.show(&src).await;
    assert_eq!(fx.widget.drive().await, Some(WidgetEvent::Loaded));
    assert!(fx.widget.image_is_loaded());
    assert!(!fx.widget.image_is_visible());

    assert_eq!(fx.widget.drive().await, Some(WidgetEvent::Visible));
    assert!(fx.widget.image_is_visible());
}

#[tokio::test]
async fn resize_reapplies_placement_for_the_new_viewport() {
    let mut fx = fixture();
    let src = fx.jpeg_src.clone();

    fx.widget.show(&src).await;
    drive_until_visible(&mut fx.widget).await;

    *fx.viewport.lock().unwrap() = Viewport::new(1000.0, 250.0);
    fx.widget.resize();

    let recording = fx.recording.lock().unwrap();
    let placement = *recording.placements.last().unwrap();
    assert!(placement.stretched_width >= 1000.0);
    assert!(placement.stretched_height >= 250.0);
    // Resizing repaints geometry only; the source is not re-applied.
    assert_eq!(recording.sources.len(), 1);
    drop(recording);

    let area = fx.widget.viewable_area().unwrap();
    assert!((area.width - 1000.0).abs() < 1e-9);
    assert!((area.height - 250.0).abs() < 1e-9);
    // The widget stays visible across resizes.
    assert!(fx.widget.image_is_visible());
}

#[tokio::test]
async fn update_settings_takes_effect_on_the_next_resize() {
    let mut fx = fixture();
    let src = fx.jpeg_src.clone();

    fx.widget.show(&src).await;
    drive_until_visible(&mut fx.widget).await;

    // 2:1 image on a 500x600 container overflows horizontally once the
    // container is wider than it is tall.
    *fx.viewport.lock().unwrap() = Viewport::new(400.0, 400.0);
    fx.widget.update_settings(SettingsUpdate {
        focus_x: Some(100.0),
        ..SettingsUpdate::default()
    });
    fx.widget.resize();

    let recording = fx.recording.lock().unwrap();
    let placement = *recording.placements.last().unwrap();
    assert!((placement.offset_left - (placement.stretched_width - 400.0)).abs() < 1e-9);
}

#[tokio::test]
async fn destroy_is_idempotent_and_stops_the_widget() {
    let mut fx = fixture();
    let src = fx.png_src.clone();

    fx.widget.show(&src).await;
    drive_until_visible(&mut fx.widget).await;

    fx.widget.destroy();
    fx.widget.destroy();

    assert_eq!(fx.recording.lock().unwrap().released, 1);
    assert!(!fx.widget.image_is_visible());
    assert_eq!(fx.widget.drive().await, None);

    // Commands after destroy are ignored.
    fx.widget.show(&src).await;
    fx.widget.resize();
    assert_eq!(fx.recording.lock().unwrap().sources.len(), 1);
}
