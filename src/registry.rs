use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::placement::ImageMetrics;
use crate::widget::Widget;

/// Opaque identity of a container registered with the adapter. Hosts mint
/// one per container element; the registry never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(pub u64);

/// The dispatchable widget methods, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    IsLoaded,
    ImageIsLoaded,
    ImageIsVisible,
    GetSrc,
    GetImageSize,
    Resize,
    Destroy,
}

impl Method {
    const ALL: &'static [Self] = &[
        Self::IsLoaded,
        Self::ImageIsLoaded,
        Self::ImageIsVisible,
        Self::GetSrc,
        Self::GetImageSize,
        Self::Resize,
        Self::Destroy,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::IsLoaded => "isLoaded",
            Self::ImageIsLoaded => "imageIsLoaded",
            Self::ImageIsVisible => "imageIsVisible",
            Self::GetSrc => "getSrc",
            Self::GetImageSize => "getImageSize",
            Self::Resize => "resize",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|method| raw == method.as_str())
            .ok_or_else(|| Error::UnknownMethod(raw.to_owned()))
    }
}

/// What a dispatched method produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Bool(bool),
    Src(Option<String>),
    Size(Option<ImageMetrics>),
    Done,
}

/// Adapter-layer instance store: one widget per registered container handle.
///
/// Queries against a handle that was never registered (or already destroyed)
/// answer with the defaults an unattached container would give — false and
/// no value — and commands are no-ops; only an unknown method *name* is an
/// error.
#[derive(Default)]
pub struct Registry {
    widgets: HashMap<HandleId, Widget>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `widget` under `handle`, replacing and tearing down any
    /// instance already attached there.
    pub fn attach(&mut self, handle: HandleId, widget: Widget) -> &mut Widget {
        if let Some(mut previous) = self.widgets.insert(handle, widget) {
            previous.destroy();
        }
        self.widgets
            .get_mut(&handle)
            .expect("widget was just inserted")
    }

    pub fn get_mut(&mut self, handle: HandleId) -> Option<&mut Widget> {
        self.widgets.get_mut(&handle)
    }

    pub fn contains(&self, handle: HandleId) -> bool {
        self.widgets.contains_key(&handle)
    }

    /// Dispatches a method by wire name.
    pub fn dispatch_name(&mut self, handle: HandleId, name: &str) -> Result<Outcome, Error> {
        Ok(self.dispatch(handle, name.parse()?))
    }

    pub fn dispatch(&mut self, handle: HandleId, method: Method) -> Outcome {
        match method {
            Method::IsLoaded => Outcome::Bool(
                self.widgets
                    .get(&handle)
                    .map(Widget::is_loaded)
                    .unwrap_or(false),
            ),
            Method::ImageIsLoaded => Outcome::Bool(
                self.widgets
                    .get(&handle)
                    .map(Widget::image_is_loaded)
                    .unwrap_or(false),
            ),
            Method::ImageIsVisible => Outcome::Bool(
                self.widgets
                    .get(&handle)
                    .map(Widget::image_is_visible)
                    .unwrap_or(false),
            ),
            Method::GetSrc => Outcome::Src(
                self.widgets
                    .get(&handle)
                    .and_then(|widget| widget.src().map(str::to_owned)),
            ),
            Method::GetImageSize => Outcome::Size(
                self.widgets
                    .get(&handle)
                    .and_then(Widget::image_size),
            ),
            Method::Resize => {
                if let Some(widget) = self.widgets.get_mut(&handle) {
                    widget.resize();
                }
                Outcome::Done
            }
            Method::Destroy => {
                if let Some(mut widget) = self.widgets.remove(&handle) {
                    widget.destroy();
                }
                Outcome::Done
            }
        }
    }
}
