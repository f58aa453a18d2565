//! Frames shared between the updater and the renderer
//!
//! The updater is the only writer. It swaps a complete `Arc<Snapshot>` in under a
//! write lock; readers clone the `Arc` under a read lock and draw from it, so a
//! reader never observes a partially built frame.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use super::shapes::DrawItem;

/// Everything the presentation sink needs for one frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// Simulation step that produced this frame (0 = nothing simulated yet)
    pub tick: u64,
    /// Draw items sorted by z ascending
    pub items: Vec<DrawItem>,
    pub score: u64,
    pub best_score: u64,
    pub paused: bool,
    pub ship_destroyed: bool,
}

/// Single-writer/multi-reader slot holding the latest frame
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    latest: RwLock<Arc<Snapshot>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame
    pub fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        let mut slot = self.latest.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = snapshot;
    }

    /// The most recently published frame
    pub fn latest(&self) -> Arc<Snapshot> {
        let slot = self.latest.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_publish_replaces_whole_frame() {
        let publisher = SnapshotPublisher::new();
        assert_eq!(publisher.latest().tick, 0);

        publisher.publish(Snapshot { tick: 3, score: 10, ..Default::default() });
        let frame = publisher.latest();
        assert_eq!(frame.tick, 3);
        assert_eq!(frame.score, 10);
    }

    #[test]
    fn test_reader_keeps_old_frame_alive() {
        let publisher = SnapshotPublisher::new();
        publisher.publish(Snapshot { tick: 1, ..Default::default() });
        let held = publisher.latest();
        publisher.publish(Snapshot { tick: 2, ..Default::default() });
        assert_eq!(held.tick, 1);
        assert_eq!(publisher.latest().tick, 2);
    }

    #[test]
    fn test_concurrent_readers_see_consistent_frames() {
        let publisher = Arc::new(SnapshotPublisher::new());
        let writer = {
            let publisher = Arc::clone(&publisher);
            thread::spawn(move || {
                for tick in 1..=200 {
                    publisher.publish(Snapshot { tick, score: tick * 2, ..Default::default() });
                }
            })
        };
        let reader = {
            let publisher = Arc::clone(&publisher);
            thread::spawn(move || {
                for _ in 0..200 {
                    let frame = publisher.latest();
                    assert_eq!(frame.score, frame.tick * 2);
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();
    }
}
