//! Astro Space entry point
//!
//! Runs the kernel headless: a scripted pilot drives the keyboard for a few
//! seconds while a logging sink stands in for a window. Settings JSON may be
//! supplied through `ASTRO_SPACE_SETTINGS`.

use std::error::Error;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use astro_space::audio::{AudioManager, SoundEffect};
use astro_space::platform::{Key, SharedKeyboard};
use astro_space::render::{DrawCommand, PresentError, PresentationSink, Snapshot};
use astro_space::runtime::Runtime;
use astro_space::sim::World;
use astro_space::Settings;

const SETTINGS_ENV: &str = "ASTRO_SPACE_SETTINGS";
const RUN_TIME: Duration = Duration::from_secs(3);

/// Condensed view of a frame for the log
#[derive(Serialize)]
struct FrameSummary<'a> {
    tick: u64,
    items: usize,
    score: u64,
    best_score: u64,
    paused: bool,
    ship_destroyed: bool,
    hud: Vec<&'a str>,
}

impl<'a> FrameSummary<'a> {
    fn new(frame: &'a Snapshot) -> Self {
        let hud = frame
            .items
            .iter()
            .filter_map(|item| match &item.command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        Self {
            tick: frame.tick,
            items: frame.items.len(),
            score: frame.score,
            best_score: frame.best_score,
            paused: frame.paused,
            ship_destroyed: frame.ship_destroyed,
            hud,
        }
    }
}

/// Logs one frame summary per second of simulation
struct LogSink {
    every: u64,
}

impl PresentationSink for LogSink {
    fn present(&mut self, frame: &Snapshot) -> Result<(), PresentError> {
        if frame.tick % self.every != 0 {
            return Ok(());
        }
        let line = serde_json::to_string(&FrameSummary::new(frame))
            .map_err(|e| PresentError::Backend(e.to_string()))?;
        log::info!("frame {}", line);
        Ok(())
    }
}

fn load_settings() -> Result<Settings, Box<dyn Error>> {
    match std::env::var(SETTINGS_ENV) {
        Ok(json) => Ok(Settings::from_json(&json)?),
        Err(_) => Ok(Settings::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0);

    let mut audio = AudioManager::silent();
    audio.apply_settings(&settings);
    audio.play(SoundEffect::StartGame);

    let sink = LogSink {
        every: settings.update_rate.max(1) as u64,
    };
    let world = World::new(settings, seed);
    let keyboard = SharedKeyboard::new();
    let runtime = Runtime::start(world, keyboard.clone(), audio, Box::new(sink))?;

    // Turn slowly and fire a shot every half second
    keyboard.key_down(Key::Right);
    let pulses = (RUN_TIME.as_millis() / 500) as u32;
    for _ in 0..pulses {
        keyboard.key_down(Key::Fire);
        thread::sleep(Duration::from_millis(250));
        keyboard.key_up(Key::Fire);
        thread::sleep(Duration::from_millis(250));
    }
    keyboard.key_up(Key::Right);

    let report = runtime.stop()?;
    let ship_alive = report.world.ship().is_some_and(|ship| ship.is_alive());
    log::info!(
        "Finished: {} steps, {} frames, {} failed steps, score {}, ship {}",
        report.world.tick_count,
        report.frames_presented,
        report.failed_steps,
        report.world.snapshot().score,
        if ship_alive { "alive" } else { "destroyed" }
    );
    Ok(())
}
