use tokio::select;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{Capabilities, Settings, SettingsUpdate};
use crate::events::{FadeDone, LoadComplete, LoadRequest};
use crate::lifecycle::{Hooks, Lifecycle};
use crate::placement::{ImageMetrics, ViewableArea};
use crate::strategy::{RenderMode, Surface};
use crate::tasks::{fade, loader};

const LOAD_CHANNEL_DEPTH: usize = 8;

/// A state change observed by [`Widget::drive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The current image finished loading and its fade has started.
    Loaded,
    /// The current image finished fading in.
    Visible,
}

/// One container's widget: the lifecycle state machine wired to a loader
/// task, fade timers and a surface, over tokio channels with cooperative
/// cancellation.
///
/// Commands (`show`, `resize`, `update_settings`, `destroy`) and queries are
/// plain methods; [`Widget::drive`] pumps collaborator completions into the
/// lifecycle and reports the transitions the host cares about.
pub struct Widget {
    lifecycle: Lifecycle,
    surface: Box<dyn Surface>,
    mode: RenderMode,
    load_tx: Sender<LoadRequest>,
    done_rx: Receiver<LoadComplete>,
    fade_tx: Sender<FadeDone>,
    fade_rx: Receiver<FadeDone>,
    cancel: CancellationToken,
}

impl Widget {
    /// Builds the widget and spawns its loader task. Must be called from
    /// within a tokio runtime.
    pub fn new(
        settings: Settings,
        hooks: Hooks,
        capabilities: Capabilities,
        surface: Box<dyn Surface>,
    ) -> Self {
        let (load_tx, load_rx) = mpsc::channel(LOAD_CHANNEL_DEPTH);
        let (done_tx, done_rx) = mpsc::channel(LOAD_CHANNEL_DEPTH);
        let (fade_tx, fade_rx) = mpsc::channel(LOAD_CHANNEL_DEPTH);
        let cancel = CancellationToken::new();

        tokio::spawn(loader::run(load_rx, done_tx, cancel.child_token()));

        Self {
            lifecycle: Lifecycle::with_hooks(settings, hooks),
            surface,
            mode: RenderMode::for_capabilities(capabilities),
            load_tx,
            done_rx,
            fade_tx,
            fade_rx,
            cancel,
        }
    }

    /// Requests `src`; any in-flight load is superseded and its eventual
    /// completion will be discarded.
    pub async fn show(&mut self, src: &str) {
        let Some(request) = self.lifecycle.show_image(src) else {
            return;
        };
        if self.load_tx.send(request).await.is_err() {
            warn!(%src, "loader unavailable; show request dropped");
        }
    }

    /// Handler for the host's zero-argument resize notification. Re-reads
    /// the viewport from the surface and re-applies placement when the
    /// render mode needs it. Never changes lifecycle state.
    pub fn resize(&mut self) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        if !self.mode.handles_resize() {
            debug!("resize ignored; surface covers natively");
            return;
        }
        let viewport = self.surface.viewport();
        if let Some(placement) = self.lifecycle.resize(viewport) {
            self.surface.apply_placement(placement);
        }
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        self.lifecycle.update_settings(update);
    }

    /// Awaits the next observable transition. Stale completions are pumped
    /// through (and discarded by the lifecycle) without surfacing an event.
    /// Returns `None` once destroyed or when every collaborator is gone.
    pub async fn drive(&mut self) -> Option<WidgetEvent> {
        loop {
            select! {
                _ = self.cancel.cancelled() => return None,

                Some(done) = self.done_rx.recv() => {
                    if let Some(event) = self.handle_load_complete(done) {
                        return Some(event);
                    }
                }

                Some(FadeDone { token }) = self.fade_rx.recv() => {
                    let was_visible = self.lifecycle.image_is_visible();
                    self.lifecycle.fade_completed(token);
                    if !was_visible && self.lifecycle.image_is_visible() {
                        return Some(WidgetEvent::Visible);
                    }
                }

                else => return None,
            }
        }
    }

    fn handle_load_complete(&mut self, done: LoadComplete) -> Option<WidgetEvent> {
        let fade = self.lifecycle.load_completed(done)?;

        self.mode.present(
            self.surface.as_mut(),
            self.lifecycle.src().unwrap_or_default(),
            self.lifecycle.image_size(),
            self.lifecycle.settings().focus(),
        );

        if fade.duration.is_zero() {
            // An unanimated fade completes immediately.
            self.lifecycle.fade_completed(fade.token);
            Some(WidgetEvent::Visible)
        } else {
            tokio::spawn(fade::run(fade, self.fade_tx.clone()));
            Some(WidgetEvent::Loaded)
        }
    }

    pub fn image_is_loaded(&self) -> bool {
        self.lifecycle.image_is_loaded()
    }

    pub fn image_is_visible(&self) -> bool {
        self.lifecycle.image_is_visible()
    }

    /// Deprecated alias of [`Widget::image_is_visible`].
    pub fn is_loaded(&self) -> bool {
        self.lifecycle.is_loaded()
    }

    pub fn image_size(&self) -> Option<ImageMetrics> {
        self.lifecycle.image_size()
    }

    pub fn src(&self) -> Option<&str> {
        self.lifecycle.src()
    }

    pub fn viewable_area(&self) -> Option<ViewableArea> {
        self.lifecycle.viewable_area(self.surface.viewport())
    }

    /// Tears the widget down: stops the loader, finalizes the lifecycle and
    /// releases the surface. Idempotent.
    pub fn destroy(&mut self) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        self.cancel.cancel();
        self.lifecycle.destroy();
        self.surface.release();
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
