//! Updater and renderer threads
//!
//! The updater owns the world. It converts wall-clock time into fixed steps,
//! runs them and publishes a snapshot after each one. The renderer only reads
//! the latest snapshot and hands new ones to the presentation sink. Both poll
//! one shared stop flag and exit after their current step or frame.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::audio::AudioManager;
use crate::platform::{FixedTimestep, InputSource};
use crate::render::{PresentationSink, SnapshotPublisher};
use crate::sim::{World, tick};

/// Sleep between polls when there is nothing to do
const IDLE_SLEEP: Duration = Duration::from_millis(1);

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} thread panicked")]
    Panicked(&'static str),
}

/// What a finished run hands back
#[derive(Debug)]
pub struct RunReport {
    pub world: World,
    /// Steps whose update panicked and was skipped
    pub failed_steps: u64,
    pub frames_presented: u64,
}

/// Running updater/renderer pair
pub struct Runtime {
    stop: Arc<AtomicBool>,
    publisher: Arc<SnapshotPublisher>,
    updater: JoinHandle<(World, u64)>,
    renderer: JoinHandle<u64>,
}

impl Runtime {
    /// Spawn both threads. The world, input and audio move to the updater.
    pub fn start<I>(
        world: World,
        input: I,
        audio: AudioManager,
        sink: Box<dyn PresentationSink>,
    ) -> Result<Self, RuntimeError>
    where
        I: InputSource + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let publisher = Arc::new(SnapshotPublisher::new());
        publisher.publish(world.snapshot());

        let updater = {
            let stop = Arc::clone(&stop);
            let publisher = Arc::clone(&publisher);
            thread::Builder::new()
                .name("updater".into())
                .spawn(move || update_loop(world, input, audio, &publisher, &stop))
                .map_err(|source| RuntimeError::Spawn { name: "updater", source })?
        };

        let renderer = {
            let stop_flag = Arc::clone(&stop);
            let publisher = Arc::clone(&publisher);
            let spawned = thread::Builder::new()
                .name("renderer".into())
                .spawn(move || render_loop(sink, &publisher, &stop_flag));
            match spawned {
                Ok(handle) => handle,
                Err(source) => {
                    stop.store(true, Ordering::Release);
                    let _ = updater.join();
                    return Err(RuntimeError::Spawn { name: "renderer", source });
                }
            }
        };

        log::info!("Runtime started");
        Ok(Self {
            stop,
            publisher,
            updater,
            renderer,
        })
    }

    /// Flag both loops poll; setting it asks them to finish
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn publisher(&self) -> Arc<SnapshotPublisher> {
        Arc::clone(&self.publisher)
    }

    pub fn is_finished(&self) -> bool {
        self.updater.is_finished() && self.renderer.is_finished()
    }

    /// Signal stop and wait for both threads
    pub fn stop(self) -> Result<RunReport, RuntimeError> {
        self.stop.store(true, Ordering::Release);
        let frames_presented = self
            .renderer
            .join()
            .map_err(|_| RuntimeError::Panicked("renderer"))?;
        let (world, failed_steps) = self
            .updater
            .join()
            .map_err(|_| RuntimeError::Panicked("updater"))?;
        log::info!(
            "Runtime stopped after {} steps, {} frames presented",
            world.tick_count,
            frames_presented
        );
        Ok(RunReport {
            world,
            failed_steps,
            frames_presented,
        })
    }
}

fn update_loop<I: InputSource>(
    mut world: World,
    mut input: I,
    mut audio: AudioManager,
    publisher: &SnapshotPublisher,
    stop: &AtomicBool,
) -> (World, u64) {
    let mut clock = FixedTimestep::new(world.settings.update_rate, world.settings.max_catch_up_steps);
    let mut last = Instant::now();
    let mut failed_steps = 0;

    while !stop.load(Ordering::Acquire) {
        let now = Instant::now();
        let steps = clock.accumulate(now - last);
        last = now;
        if steps == 0 {
            thread::sleep(IDLE_SLEEP);
            continue;
        }

        for _ in 0..steps {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                tick(&mut world, &mut input, &mut audio);
            }));
            if let Err(payload) = result {
                failed_steps += 1;
                log::error!(
                    "Step {} failed and was skipped: {}",
                    world.tick_count,
                    panic_message(payload.as_ref())
                );
            }
            publisher.publish(world.snapshot());
        }
    }
    (world, failed_steps)
}

fn render_loop(mut sink: Box<dyn PresentationSink>, publisher: &SnapshotPublisher, stop: &AtomicBool) -> u64 {
    let mut presented_tick = None;
    let mut frames = 0;

    while !stop.load(Ordering::Acquire) {
        let frame = publisher.latest();
        if presented_tick == Some(frame.tick) {
            thread::sleep(IDLE_SLEEP);
            continue;
        }
        presented_tick = Some(frame.tick);
        match sink.present(&frame) {
            Ok(()) => frames += 1,
            Err(e) => log::warn!("Frame {} not presented: {}", frame.tick, e),
        }
    }
    frames
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SharedKeyboard;
    use crate::render::{PresentError, Snapshot};
    use crate::settings::Settings;
    use std::sync::Mutex;

    struct Collect(Arc<Mutex<Vec<u64>>>);

    impl PresentationSink for Collect {
        fn present(&mut self, frame: &Snapshot) -> Result<(), PresentError> {
            self.0.lock().unwrap().push(frame.tick);
            Ok(())
        }
    }

    struct Broken;

    impl PresentationSink for Broken {
        fn present(&mut self, _frame: &Snapshot) -> Result<(), PresentError> {
            Err(PresentError::SurfaceLost)
        }
    }

    #[test]
    fn test_runs_and_stops() {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let world = World::new(Settings::default(), 1);
        let runtime = Runtime::start(
            world,
            SharedKeyboard::new(),
            AudioManager::silent(),
            Box::new(Collect(Arc::clone(&ticks))),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(200));
        let report = runtime.stop().unwrap();
        assert!(report.world.tick_count > 0);
        assert_eq!(report.failed_steps, 0);

        let ticks = ticks.lock().unwrap();
        assert_eq!(ticks.len() as u64, report.frames_presented);
        // Frames arrive in step order, never repeated
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_sink_errors_do_not_stop_the_loop() {
        let world = World::new(Settings::default(), 2);
        let runtime =
            Runtime::start(world, SharedKeyboard::new(), AudioManager::silent(), Box::new(Broken)).unwrap();
        thread::sleep(Duration::from_millis(100));
        let report = runtime.stop().unwrap();
        assert_eq!(report.frames_presented, 0);
        assert!(report.world.tick_count > 0);
    }

    /// Input that panics the first time the ship reads a held key
    struct FailOnce(Arc<AtomicBool>);

    impl InputSource for FailOnce {
        fn is_pressed(&self, _key: crate::platform::Key) -> bool {
            if self.0.swap(false, Ordering::AcqRel) {
                panic!("input backend gone");
            }
            false
        }

        fn consume_press(&mut self, _key: crate::platform::Key) -> bool {
            false
        }
    }

    #[test]
    fn test_failed_step_is_counted_and_skipped() {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let world = World::new(Settings::default(), 3);
        let runtime = Runtime::start(
            world,
            FailOnce(Arc::new(AtomicBool::new(true))),
            AudioManager::silent(),
            Box::new(Collect(Arc::clone(&ticks))),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(200));
        let report = runtime.stop().unwrap();
        assert_eq!(report.failed_steps, 1);
        assert!(report.world.tick_count > 1);
        assert!(report.world.ship().is_some_and(|ship| ship.is_alive()));

        // Steps after the failed one were still published
        let ticks = ticks.lock().unwrap();
        assert!(ticks.last().is_some_and(|&tick| tick > 1));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(3_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
