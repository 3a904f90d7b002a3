use anyhow::{Context, Result};
use image::ImageReader;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::{LoadComplete, LoadRequest};
use crate::placement::ImageMetrics;

/// Reads just enough of the file at `src` to learn its intrinsic pixel
/// dimensions. The format is sniffed from content, not the extension.
fn probe_dimensions(src: &str) -> Result<ImageMetrics> {
    let reader = ImageReader::open(src)
        .with_context(|| format!("failed to open image at {src}"))?
        .with_guessed_format()
        .context("failed to guess image format")?;
    let (width, height) = reader
        .into_dimensions()
        .with_context(|| format!("failed to read image dimensions for {src}"))?;
    Ok(ImageMetrics { width, height })
}

/// Image loader collaborator:
/// - Probes each requested image's dimensions on a blocking thread.
/// - Reports success and failure through the same completion channel, with
///   the request's token preserved, so the lifecycle can discard stale
///   arrivals and never hangs on a broken file.
pub async fn run(
    mut load_rx: Receiver<LoadRequest>,
    done_tx: Sender<LoadComplete>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut probes: JoinSet<LoadComplete> = JoinSet::new();

    loop {
        select! {
            _ = cancel.cancelled() => break,

            Some(LoadRequest { src, token }) = load_rx.recv() => {
                probes.spawn(async move {
                    let probe = {
                        let src = src.clone();
                        tokio::task::spawn_blocking(move || probe_dimensions(&src)).await
                    };
                    let metrics = match probe {
                        Ok(Ok(metrics)) => {
                            debug!(%src, width = metrics.width, height = metrics.height, "probed");
                            Some(metrics)
                        }
                        Ok(Err(err)) => {
                            // Failed loads still complete; the lifecycle
                            // fades them in without a size.
                            warn!(%src, "image load failed: {err:#}");
                            None
                        }
                        Err(err) => {
                            warn!(%src, "probe task failed: {err}");
                            None
                        }
                    };
                    LoadComplete { token, metrics }
                });
            }

            Some(join_res) = probes.join_next() => {
                if let Ok(done) = join_res {
                    if done_tx.send(done).await.is_err() {
                        break;
                    }
                }
            }

            else => break,
        }
    }
    Ok(())
}
