use std::time::Duration;

use crate::placement::ImageMetrics;

/// Identity of a single show-image request.
///
/// Minted fresh by the lifecycle for every show; completions that arrive
/// carrying any other token are stale and discarded without a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub src: String,
    pub token: RequestToken,
}

/// Completion of a load request. `metrics` is `None` when the probe failed;
/// failures travel through the same channel as successes so the state
/// machine never hangs in Loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadComplete {
    pub token: RequestToken,
    pub metrics: Option<ImageMetrics>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeRequest {
    pub token: RequestToken,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeDone {
    pub token: RequestToken,
}
