use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::placement::Focus;

/// Per-widget display settings.
///
/// Parsed from kebab-case YAML; every field has a default so hosts can
/// supply only what they care about. The legacy `centered-x`/`centered-y`
/// flags predate the focus points and, when set, pin the matching focus
/// coordinate back to 50.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Source of the image to show (or currently showing).
    pub src: Option<String>,
    /// Focus position from the left, 0..=100.
    pub focus_x: f64,
    /// Focus position from the top, 0..=100.
    pub focus_y: f64,
    /// Fade-in duration once the image has loaded. Zero fades in immediately.
    #[serde(with = "humantime_serde")]
    pub speed: Duration,
    /// Legacy flag: center the image on the X axis, overriding `focus-x`.
    pub centered_x: Option<bool>,
    /// Legacy flag: center the image on the Y axis, overriding `focus-y`.
    pub centered_y: Option<bool>,
}

impl Settings {
    const fn default_focus() -> f64 {
        50.0
    }

    const fn default_speed() -> Duration {
        Duration::ZERO
    }

    /// The effective focus point, with the legacy centered flags applied.
    pub fn focus(&self) -> Focus {
        let x = if self.centered_x == Some(true) {
            Self::default_focus()
        } else {
            self.focus_x
        };
        let y = if self.centered_y == Some(true) {
            Self::default_focus()
        } else {
            self.focus_y
        };
        Focus::new(x, y)
    }

    /// Folds a partial update into these settings. Fields left out of the
    /// update keep their current value; nothing is recomputed or reloaded
    /// here — hosts call resize or show explicitly afterwards.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(src) = update.src {
            self.src = Some(src);
        }
        if let Some(x) = update.focus_x {
            self.focus_x = x;
        }
        if let Some(y) = update.focus_y {
            self.focus_y = y;
        }
        if let Some(speed) = update.speed {
            self.speed = speed;
        }
        if let Some(flag) = update.centered_x {
            self.centered_x = Some(flag);
        }
        if let Some(flag) = update.centered_y {
            self.centered_y = Some(flag);
        }
    }

    /// Validate runtime invariants that cannot be expressed via serde
    /// defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            (0.0..=100.0).contains(&self.focus_x),
            "focus-x must be between 0 and 100"
        );
        ensure!(
            (0.0..=100.0).contains(&self.focus_y),
            "focus-y must be between 0 and 100"
        );
        if let Some(src) = &self.src {
            ensure!(!src.is_empty(), "src must not be empty");
        }
        Ok(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            src: None,
            focus_x: Self::default_focus(),
            focus_y: Self::default_focus(),
            speed: Self::default_speed(),
            centered_x: None,
            centered_y: None,
        }
    }
}

/// A partial settings change, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SettingsUpdate {
    pub src: Option<String>,
    pub focus_x: Option<f64>,
    pub focus_y: Option<f64>,
    #[serde(with = "humantime_serde::option")]
    pub speed: Option<Duration>,
    pub centered_x: Option<bool>,
    pub centered_y: Option<bool>,
}

/// Process-wide surface capabilities, probed once at startup by the host and
/// passed into constructors. Never read as ambient global state.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Capabilities {
    /// Whether the surface can crop-to-fill on its own. When false, the
    /// widget stretches and positions the image manually.
    pub native_cover: bool,
}

/// Width/height of a container surface, as configured for the demo binary.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

/// Top-level configuration for the demo binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Widget settings (src, focus, speed, legacy centering).
    pub settings: Settings,
    /// Host-probed surface capabilities.
    pub capabilities: Capabilities,
    /// Initial container size.
    pub container: SurfaceSize,
    /// Container sizes to replay as resize events after the image is shown.
    pub resizes: Vec<SurfaceSize>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&s).context("parsing configuration YAML")
    }

    pub fn validated(mut self) -> Result<Self> {
        self.settings = self.settings.validated()?;
        ensure!(
            self.settings.src.is_some(),
            "configuration must name an image src"
        );
        ensure!(
            self.container.width > 0.0 && self.container.height > 0.0,
            "container dimensions must be positive"
        );
        for size in &self.resizes {
            ensure!(
                size.width > 0.0 && size.height > 0.0,
                "resize dimensions must be positive"
            );
        }
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            capabilities: Capabilities::default(),
            container: SurfaceSize {
                width: 1280.0,
                height: 720.0,
            },
            resizes: Vec::new(),
        }
    }
}
