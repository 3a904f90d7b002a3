//! Stretched-size and offset math for covering a surface with an image.
//!
//! Everything in this module is pure arithmetic over `f64`, so results are
//! reproducible in tests without a real surface behind them.

/// Intrinsic pixel dimensions of a loaded image.
///
/// Captured once when a load completes and discarded when a new image is
/// requested. `height` is always positive for a decodable image, which keeps
/// [`ImageMetrics::ratio`] well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetrics {
    pub width: u32,
    pub height: u32,
}

impl ImageMetrics {
    /// Width-to-height aspect ratio.
    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Current width/height of the container's visible area.
///
/// Owned by the surface; read fresh for every placement computation because
/// it changes whenever the container resizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Focus point: the percentage of the cropped axis kept anchored when the
/// stretched image overflows the container. (50, 50) is a centered crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Focus {
    pub x: f64,
    pub y: f64,
}

impl Focus {
    pub const CENTERED: Self = Self { x: 50.0, y: 50.0 };

    /// Builds a focus point, clamping each coordinate into `0..=100`.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
        }
    }
}

impl Default for Focus {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// Computed size and position for a stretched image.
///
/// The stretched rectangle covers the viewport in both axes; one axis matches
/// the viewport exactly and carries no offset, the other overflows and is
/// pulled back by its offset. Offsets are reported as positive distances from
/// the image's top/left edge to the viewport's top/left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub stretched_width: f64,
    pub stretched_height: f64,
    pub offset_left: f64,
    pub offset_top: f64,
}

/// The window the container cuts out of the stretched image: the viewport
/// dimensions together with the placement that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewableArea {
    pub width: f64,
    pub height: f64,
    pub offset_left: f64,
    pub offset_top: f64,
    pub stretched_width: f64,
    pub stretched_height: f64,
}

/// Computes the stretched size and offsets needed for `image_ratio` to cover
/// `viewport` while keeping `focus` proportionally visible.
///
/// Scaling first anchors on width; if that already covers the container
/// vertically (including exact equality) the vertical overflow is distributed
/// by `focus.y`. Otherwise scaling re-anchors on height and the horizontal
/// overflow is distributed by `focus.x`.
///
/// Preconditions: `image_ratio` must be positive and finite, and both
/// viewport dimensions must be positive. Violating them yields an undefined
/// (NaN/infinite) result rather than a guessed recovery; callers guard.
pub fn compute_placement(image_ratio: f64, viewport: Viewport, focus: Focus) -> Placement {
    let mut stretched_width = viewport.width;
    let mut stretched_height = stretched_width / image_ratio;
    let mut offset_left = 0.0;
    let mut offset_top = 0.0;

    if stretched_height >= viewport.height {
        offset_top = (stretched_height - viewport.height) * focus.y / 100.0;
    } else {
        stretched_height = viewport.height;
        stretched_width = stretched_height * image_ratio;
        offset_left = (stretched_width - viewport.width) * focus.x / 100.0;
    }

    Placement {
        stretched_width,
        stretched_height,
        offset_left,
        offset_top,
    }
}

/// Describes the currently viewable slice of a stretched image.
pub fn viewable_area(metrics: ImageMetrics, viewport: Viewport, focus: Focus) -> ViewableArea {
    let placement = compute_placement(metrics.ratio(), viewport, focus);
    ViewableArea {
        width: viewport.width,
        height: viewport.height,
        offset_left: placement.offset_left,
        offset_top: placement.offset_top,
        stretched_width: placement.stretched_width,
        stretched_height: placement.stretched_height,
    }
}
