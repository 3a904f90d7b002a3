//! Binary entrypoint for fillview.
//!
//! Headless demo host: shows a configured image against a logging surface,
//! replays scripted resizes, and prints the resulting viewable area.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use fillview::config::Configuration;
use fillview::lifecycle::Hooks;
use fillview::placement::Viewport;
use fillview::registry::{HandleId, Method, Registry};
use fillview::strategy::LogSurface;
use fillview::widget::{Widget, WidgetEvent};

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "fillview", about = "Cover a container with an image")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter =
        EnvFilter::from_default_env().add_directive(format!("fillview={}", level).parse().unwrap());
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = Configuration::from_yaml_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?
        .validated()
        .context("validating configuration")?;

    let src = cfg
        .settings
        .src
        .clone()
        .expect("validated configuration carries a src");
    let initial = Viewport::new(cfg.container.width, cfg.container.height);
    let (surface, viewport) = LogSurface::shared(initial);

    let mut widget = Widget::new(
        cfg.settings.clone(),
        Hooks::default(),
        cfg.capabilities,
        Box::new(surface),
    );
    widget.show(&src).await;

    // Pump completions until the image has faded in, staying responsive to
    // ctrl-c so a broken config can't wedge the process.
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; shutting down");
                widget.destroy();
                return Ok(());
            }
            event = widget.drive() => match event {
                Some(WidgetEvent::Loaded) => {
                    info!(size = ?widget.image_size(), "image loaded; fading in");
                }
                Some(WidgetEvent::Visible) => break,
                None => anyhow::bail!("widget stopped before the image became visible"),
            }
        }
    }
    info!(area = ?widget.viewable_area(), "image visible");

    // Replay the scripted container resizes.
    for size in &cfg.resizes {
        *viewport.lock().expect("viewport handle poisoned") =
            Viewport::new(size.width, size.height);
        widget.resize();
        info!(
            width = size.width,
            height = size.height,
            area = ?widget.viewable_area(),
            "container resized"
        );
    }

    // Drive the plugin-style surface once so the demo exercises it too.
    let mut registry = Registry::new();
    let handle = HandleId(0);
    registry.attach(handle, widget);
    info!(
        visible = ?registry.dispatch(handle, Method::ImageIsVisible),
        "registry query"
    );
    registry.dispatch(handle, Method::Destroy);

    Ok(())
}
