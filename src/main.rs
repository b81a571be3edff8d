//! treebloom headless runner
//!
//! Loads a scene config from JSON and plays one scripted cycle at a fixed
//! 60 Hz step, logging phase changes and per-frame batch statistics.
//!
//! Usage: `treebloom [scene.json]`

use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use treebloom::prelude::*;

const STEP: f32 = 1.0 / 60.0;

/// Scripted interaction, keyed by clock time in seconds.
#[derive(Debug, Clone, Copy)]
enum Cue {
    DoubleClick,
    Select(usize),
    FocusPhoto(usize),
    Pointer(Vec2),
}

const SCRIPT: &[(f32, Cue)] = &[
    (0.5, Cue::Pointer(Vec2::new(0.2, 0.1))),
    (1.0, Cue::Select(0)),
    (1.5, Cue::DoubleClick),
    (2.0, Cue::DoubleClick),
    (7.0, Cue::FocusPhoto(3)),
    (8.0, Cue::DoubleClick),
    (9.0, Cue::DoubleClick),
    (13.0, Cue::Select(1)),
];

const RUN_SECONDS: f32 = 14.0;

fn load_config() -> SceneConfig {
    let Some(path) = env::args().nth(1).map(PathBuf::from) else {
        log::info!("no config file specified, using defaults");
        return SceneConfig::default();
    };

    match SceneConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("failed to load config from {:?}: {}; using defaults", path, e);
            SceneConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config().with_fixed_delta(STEP);
    let mut input = Input::with_double_click(Duration::from_millis(config.double_click_ms));
    let mut scene = Scene::new(&config);

    let origin = Instant::now();
    let mut script = SCRIPT.iter().peekable();
    let mut last_phase = scene.phase();
    let mut last_guidance = scene.guidance();
    let mut uploaded = 0usize;

    while scene.time() < RUN_SECONDS {
        while let Some((_, cue)) = script.next_if(|(at, _)| *at <= scene.time()) {
            let now = origin + Duration::from_secs_f32(scene.time());
            match *cue {
                Cue::DoubleClick => {
                    input.press(now);
                    input.press(now + Duration::from_millis(config.double_click_ms / 2));
                }
                Cue::Select(index) => match scene.select_ornament(index) {
                    Some(request) => log::info!(
                        "ornament {} plays {}",
                        index,
                        scene.audio_clip(request).unwrap_or("<no clip>")
                    ),
                    None => log::info!("ornament {} is inert", index),
                },
                Cue::FocusPhoto(index) => {
                    if scene.toggle_photo_focus(index) {
                        log::info!("focus -> {:?}", scene.focus());
                    }
                }
                Cue::Pointer(ndc) => scene.set_pointer(ndc),
            }
        }

        for event in input.drain_events() {
            let outcome = scene.handle_input(event);
            log::debug!("{:?} -> {:?}", event, outcome);
        }

        let frame = scene.tick();
        if frame.particles.is_dirty() {
            uploaded += frame.particles.as_bytes().len() + frame.ornaments.as_bytes().len();
        }

        if frame.phase != last_phase {
            let extent = frame
                .particles
                .instances()
                .iter()
                .map(|p| p.position.length())
                .fold(0.0f32, f32::max);
            log::info!(
                "t={:.2}s {} | star {:.2} | particle extent {:.2}",
                frame.time,
                frame.phase,
                frame.star.scale,
                extent
            );
            last_phase = frame.phase;
        }

        if scene.guidance() != last_guidance {
            last_guidance = scene.guidance();
            log::info!("guidance: {}", last_guidance);
        }
    }

    log::info!(
        "finished in phase {} after {} frames ({:?}), {:.1} MiB of instance data",
        scene.phase(),
        scene.clock().frame(),
        scene.clock().elapsed_duration(),
        uploaded as f64 / (1024.0 * 1024.0)
    );
}
