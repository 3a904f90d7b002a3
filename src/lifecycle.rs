use tracing::debug;

use crate::config::{Settings, SettingsUpdate};
use crate::events::{FadeRequest, LoadComplete, LoadRequest, RequestToken};
use crate::placement::{self, ImageMetrics, Placement, ViewableArea, Viewport};

/// Where an instance sits between requesting an image and having it on
/// screen. `Loading` begins synchronously inside [`Lifecycle::show_image`];
/// `Loaded` and `Visible` are reached from collaborator completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Visible,
}

/// Host-supplied completion callbacks. `callback` is the legacy name for
/// `on_image_visible` and fires only when the newer hook is absent.
#[derive(Default)]
pub struct Hooks {
    pub on_image_load: Option<Box<dyn FnMut() + Send>>,
    pub on_image_visible: Option<Box<dyn FnMut() + Send>>,
    pub callback: Option<Box<dyn FnMut() + Send>>,
}

/// State machine coordinating one container's image: load, fade, resize,
/// destroy. Owns no I/O; collaborators feed completions back in and act on
/// the requests this returns.
///
/// At most one image is ever current. Every show mints a fresh
/// [`RequestToken`], and completions carrying any other token are discarded,
/// so a superseded load can never fade in over its replacement.
pub struct Lifecycle {
    settings: Settings,
    hooks: Hooks,
    phase: Phase,
    destroyed: bool,
    metrics: Option<ImageMetrics>,
    current: Option<RequestToken>,
    next_token: u64,
}

impl Lifecycle {
    pub fn new(settings: Settings) -> Self {
        Self::with_hooks(settings, Hooks::default())
    }

    pub fn with_hooks(settings: Settings, hooks: Hooks) -> Self {
        Self {
            settings,
            hooks,
            phase: Phase::Idle,
            destroyed: false,
            metrics: None,
            current: None,
            next_token: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Begins showing `src`: clears the loaded/visible flags synchronously,
    /// supersedes any in-flight request, and hands back the load request for
    /// the caller to forward to its loader. Returns `None` once destroyed.
    pub fn show_image(&mut self, src: impl Into<String>) -> Option<LoadRequest> {
        if self.destroyed {
            return None;
        }

        let src = src.into();
        self.settings.src = Some(src.clone());
        self.metrics = None;
        self.phase = Phase::Loading;

        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.current = Some(token);

        debug!(%src, token = token.0, "image requested");
        Some(LoadRequest { src, token })
    }

    /// Feeds a load completion back in. A stale or post-destroy completion
    /// is a no-op; whatever resource backed it is the loader's to release.
    /// A current completion moves to `Loaded` — load failures included, so
    /// the machine cannot hang in `Loading` — fires the load hook, and
    /// returns the fade to run.
    pub fn load_completed(&mut self, completion: LoadComplete) -> Option<FadeRequest> {
        if self.destroyed || self.current != Some(completion.token) {
            debug!(token = completion.token.0, "stale load discarded");
            return None;
        }

        self.metrics = completion.metrics;
        self.phase = Phase::Loaded;

        if let Some(hook) = self.hooks.on_image_load.as_mut() {
            hook();
        }

        Some(FadeRequest {
            token: completion.token,
            duration: self.settings.speed,
        })
    }

    /// Feeds a fade completion back in. Stale or post-destroy completions
    /// are no-ops; a current one makes the image visible and fires the
    /// visible hook (legacy `callback` when no `on_image_visible` is set).
    pub fn fade_completed(&mut self, token: RequestToken) {
        if self.destroyed || self.current != Some(token) || self.phase != Phase::Loaded {
            debug!(token = token.0, "stale fade discarded");
            return;
        }

        self.phase = Phase::Visible;

        let hook = self
            .hooks
            .on_image_visible
            .as_mut()
            .or(self.hooks.callback.as_mut());
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Recomputes placement for the current image against `viewport`. `None`
    /// before the image has loaded or when the probe yielded no dimensions.
    /// Never changes phase.
    pub fn resize(&mut self, viewport: Viewport) -> Option<Placement> {
        let metrics = self.loaded_metrics()?;
        Some(placement::compute_placement(
            metrics.ratio(),
            viewport,
            self.settings.focus(),
        ))
    }

    /// Merges a partial settings update. Takes effect on the next show or
    /// resize; nothing is recomputed here.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings.apply(update);
    }

    /// True once the latest requested image has finished loading.
    pub fn image_is_loaded(&self) -> bool {
        matches!(self.phase, Phase::Loaded | Phase::Visible)
    }

    /// True once the latest requested image has loaded *and* faded in.
    pub fn image_is_visible(&self) -> bool {
        self.phase == Phase::Visible
    }

    /// Deprecated alias of [`Lifecycle::image_is_visible`], kept for hosts
    /// that still call the old name.
    pub fn is_loaded(&self) -> bool {
        self.image_is_visible()
    }

    /// Intrinsic size of the current image, once known.
    pub fn image_size(&self) -> Option<ImageMetrics> {
        self.loaded_metrics()
    }

    /// Source of the image currently showing or loading.
    pub fn src(&self) -> Option<&str> {
        self.settings.src.as_deref()
    }

    /// The slice of the stretched image the container currently reveals.
    pub fn viewable_area(&self, viewport: Viewport) -> Option<ViewableArea> {
        let metrics = self.loaded_metrics()?;
        Some(placement::viewable_area(
            metrics,
            viewport,
            self.settings.focus(),
        ))
    }

    /// Tears the instance down. Idempotent: the second and later calls do
    /// nothing, and every completion arriving afterwards is ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.phase = Phase::Idle;
        self.metrics = None;
        self.current = None;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn loaded_metrics(&self) -> Option<ImageMetrics> {
        if self.image_is_loaded() {
            self.metrics
        } else {
            None
        }
    }
}
