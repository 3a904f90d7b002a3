use tokio::sync::mpsc::Sender;
use tokio::time::sleep;
use tracing::debug;

use crate::events::{FadeDone, FadeRequest};

/// Single-shot fade transition primitive.
///
/// Sleeps for the configured duration, then reports completion exactly once
/// with the request's token. A zero duration skips the sleep entirely, so an
/// unanimated fade-in completes with no visible delay.
pub async fn run(request: FadeRequest, done_tx: Sender<FadeDone>) {
    if !request.duration.is_zero() {
        sleep(request.duration).await;
    }
    debug!(token = request.token.0, duration_ms = request.duration.as_millis() as u64, "fade complete");
    let _ = done_tx
        .send(FadeDone {
            token: request.token,
        })
        .await;
}
