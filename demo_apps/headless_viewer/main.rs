//! Headless Viewer
//!
//! Loads a model and its animation description from an asset directory,
//! steps the session and logs what a renderer would draw.
//!
//! Frames advance at the description's `fps` (60 when absent). Passing
//! `realtime` as the fourth argument paces frames by wall-clock time instead.
//!
//! Usage: `headless_viewer [asset_root] [settings.json] [frames] [realtime]`

use std::time::Duration;

use anyhow::Context;
use vitrine::assets::AssetReaderVariant;
use vitrine::core::{ClockMode, DEFAULT_FPS};
use vitrine::prelude::*;

const DEFAULT_FRAMES: usize = 240;
const LOG_EVERY: usize = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let asset_root = args.next().unwrap_or_else(|| "assets".to_string());
    let settings = match args.next() {
        Some(path) => ViewerSettings::load(&path).with_context(|| format!("reading settings {path}"))?,
        None => ViewerSettings::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse().context("frame count must be an integer")?,
        None => DEFAULT_FRAMES,
    };
    let realtime = args.next().is_some_and(|mode| mode == "realtime");

    let viewport = Viewport::new(1280.0, 720.0);
    let mut session = ViewerSession::new(settings, viewport);
    let reader = AssetReaderVariant::from_path(&asset_root);

    session
        .load(&reader)
        .await
        .with_context(|| format!("loading assets from {asset_root}"))?;

    let Some(stage) = session.stage() else {
        anyhow::bail!("session not ready after load");
    };
    let report = stage.visibility();
    log::info!(
        "Visibility: {} shown, {} kept as parents, {} suppressed, {} hidden",
        report.shown,
        report.required_parents,
        report.suppressed,
        report.hidden
    );

    let mut clock = if realtime {
        FrameClock::realtime()
    } else {
        stage.frame_clock()
    };
    let pace = Duration::from_secs_f32(1.0 / stage.frame_rate().unwrap_or(DEFAULT_FPS));
    log::info!("Clock: {:?}", clock.mode());

    for frame in 0..frames {
        if matches!(clock.mode(), ClockMode::Realtime { .. }) {
            tokio::time::sleep(pace).await;
        }
        let dt = clock.tick();
        let RenderableFrame::Scene(view) = session.step(dt) else {
            continue;
        };

        if frame % LOG_EVERY == 0 {
            let drawn = view.scene.nodes.values().filter(|n| n.is_drawn()).count();
            let captions: Vec<&str> = view.captions.iter().map(|c| c.text.as_str()).collect();
            log::info!(
                "frame {frame:4} t={:.3}s drawn={drawn} captions={captions:?}",
                view.time
            );
        }
    }

    let center = viewport.size() * 0.5;
    for event in [
        PointerEvent::click(center),
        PointerEvent::click(center).with_modifiers(Modifiers::SHIFT),
    ] {
        let mode = event.pick_mode();
        let selection = session.on_pointer(event).clone();
        let names: Vec<&str> = session
            .stage()
            .map(|stage| {
                selection
                    .nodes()
                    .iter()
                    .filter_map(|&h| stage.scene().get_name(h))
                    .collect()
            })
            .unwrap_or_default();
        log::info!("Pick {mode:?} at {center}: {names:?}");
    }

    log::info!(
        "Stepped {} frames covering {:.3}s of animation",
        clock.frame_count(),
        clock.elapsed()
    );
    Ok(())
}
