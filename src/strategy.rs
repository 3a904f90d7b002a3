use std::sync::{Arc, Mutex};

use tracing::info;

use crate::config::Capabilities;
use crate::placement::{self, Focus, ImageMetrics, Placement, Viewport};

/// The paintable thing a widget covers.
///
/// Implementations own the viewport (it is re-read on every placement
/// computation) and apply whatever the active [`RenderMode`] hands them.
pub trait Surface: Send {
    /// Paints `src` into the surface's backing visual.
    fn apply_image_source(&mut self, src: &str);

    /// Positions and sizes the stretched image (manual-stretch mode only).
    fn apply_placement(&mut self, placement: Placement);

    /// Pushes the focus point as a proportional anchor (native-cover mode
    /// only; the surface does its own cropping around it).
    fn set_focus_anchor(&mut self, focus: Focus);

    /// Current size of the container's visible area.
    fn viewport(&self) -> Viewport;

    /// Releases whatever the surface holds. Called once, on destroy.
    fn release(&mut self);
}

/// How a widget gets its image to cover the container.
///
/// Chosen once at construction from the host-probed [`Capabilities`]; the
/// two variants replace what used to be a subclass per strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// The surface crops-to-fill natively; we only hand it the source and
    /// the focus anchor, and resizes need no recompute.
    NativeCover,
    /// The widget stretches and positions the image itself, on load and on
    /// every resize.
    ManualStretch,
}

impl RenderMode {
    pub fn for_capabilities(capabilities: Capabilities) -> Self {
        if capabilities.native_cover {
            Self::NativeCover
        } else {
            Self::ManualStretch
        }
    }

    /// Paints a freshly loaded image onto `surface`.
    pub fn present(
        &self,
        surface: &mut dyn Surface,
        src: &str,
        metrics: Option<ImageMetrics>,
        focus: Focus,
    ) {
        surface.apply_image_source(src);
        match self {
            Self::NativeCover => surface.set_focus_anchor(focus),
            Self::ManualStretch => {
                if let Some(metrics) = metrics {
                    let viewport = surface.viewport();
                    surface.apply_placement(placement::compute_placement(
                        metrics.ratio(),
                        viewport,
                        focus,
                    ));
                }
            }
        }
    }

    /// Whether a container resize requires recomputing and re-applying
    /// placement. Native cover surfaces re-crop on their own.
    pub fn handles_resize(&self) -> bool {
        matches!(self, Self::ManualStretch)
    }
}

/// Headless surface for the demo binary and tests: paints nothing, traces
/// everything. The viewport lives behind a shared handle so the host can
/// change it before signalling a resize.
pub struct LogSurface {
    viewport: Arc<Mutex<Viewport>>,
}

impl LogSurface {
    /// Returns the surface and the handle the host uses to resize it.
    pub fn shared(viewport: Viewport) -> (Self, Arc<Mutex<Viewport>>) {
        let handle = Arc::new(Mutex::new(viewport));
        (
            Self {
                viewport: Arc::clone(&handle),
            },
            handle,
        )
    }
}

impl Surface for LogSurface {
    fn apply_image_source(&mut self, src: &str) {
        info!(%src, "surface: image source applied");
    }

    fn apply_placement(&mut self, placement: Placement) {
        info!(
            stretched_width = placement.stretched_width,
            stretched_height = placement.stretched_height,
            offset_left = placement.offset_left,
            offset_top = placement.offset_top,
            "surface: placement applied"
        );
    }

    fn set_focus_anchor(&mut self, focus: Focus) {
        info!(focus_x = focus.x, focus_y = focus.y, "surface: focus anchor set");
    }

    fn viewport(&self) -> Viewport {
        *self.viewport.lock().expect("viewport handle poisoned")
    }

    fn release(&mut self) {
        info!("surface: released");
    }
}
