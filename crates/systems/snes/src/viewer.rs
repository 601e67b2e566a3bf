//! Viewer refresh scheduling.
//!
//! Each open debugger view registers the raster position at which it wants
//! to be refreshed. The emulation thread calls [`ViewerScheduler::on_raster_step`]
//! once per emulated cycle; when the current position matches a registered
//! target, a refresh notification for that viewer goes out through the
//! frontend's event bus.
//!
//! Registration happens on the UI thread while the scan runs on the
//! emulation thread, so the registry lives behind a mutex. The scan's
//! critical section is only the map read; notification callbacks run after
//! the lock is released.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// A precise point in the emulated display's scan timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterPos {
    pub scanline: u16,
    pub cycle: u16,
}

impl RasterPos {
    pub fn new(scanline: u16, cycle: u16) -> Self {
        Self { scanline, cycle }
    }
}

/// The event bus seam: the frontend implements this to receive refresh
/// notifications for the viewer ids it registered.
pub trait ViewerNotifier {
    fn viewer_refresh(&self, viewer_id: u32);
}

/// Maps viewer ids to their target raster position.
#[derive(Debug, Default)]
pub struct ViewerScheduler {
    targets: Mutex<HashMap<u32, RasterPos>>,
}

impl ViewerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a viewer's refresh position.
    pub fn register(&self, viewer_id: u32, pos: RasterPos) {
        let mut targets = self.targets.lock().unwrap_or_else(|e| e.into_inner());
        targets.insert(viewer_id, pos);
    }

    /// Remove a viewer; removing an unknown id is a no-op.
    pub fn unregister(&self, viewer_id: u32) {
        let mut targets = self.targets.lock().unwrap_or_else(|e| e.into_inner());
        targets.remove(&viewer_id);
    }

    /// Scan the registry for viewers targeting the current raster position
    /// and notify each match. Called once per emulated cycle; the registry
    /// itself is never mutated here.
    pub fn on_raster_step(&self, pos: RasterPos, notifier: &dyn ViewerNotifier) {
        let matches: Vec<u32> = {
            let targets = self.targets.lock().unwrap_or_else(|e| e.into_inner());
            targets
                .iter()
                .filter(|(_, &target)| target == pos)
                .map(|(&id, _)| id)
                .collect()
        };

        for viewer_id in matches {
            notifier.viewer_refresh(viewer_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingNotifier {
        refreshed: Mutex<Vec<u32>>,
    }

    impl RecordingNotifier {
        fn take(&self) -> Vec<u32> {
            std::mem::take(&mut self.refreshed.lock().unwrap())
        }
    }

    impl ViewerNotifier for RecordingNotifier {
        fn viewer_refresh(&self, viewer_id: u32) {
            self.refreshed.lock().unwrap().push(viewer_id);
        }
    }

    #[test]
    fn test_exact_match_notifies_once() {
        let scheduler = ViewerScheduler::new();
        let notifier = RecordingNotifier::default();
        scheduler.register(5, RasterPos::new(100, 200));

        scheduler.on_raster_step(RasterPos::new(100, 200), &notifier);
        assert_eq!(notifier.take(), vec![5]);

        // Near misses on either coordinate emit nothing.
        scheduler.on_raster_step(RasterPos::new(100, 201), &notifier);
        scheduler.on_raster_step(RasterPos::new(101, 200), &notifier);
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn test_register_updates_existing_target() {
        let scheduler = ViewerScheduler::new();
        let notifier = RecordingNotifier::default();
        scheduler.register(1, RasterPos::new(10, 20));
        scheduler.register(1, RasterPos::new(30, 40));

        scheduler.on_raster_step(RasterPos::new(10, 20), &notifier);
        assert!(notifier.take().is_empty());
        scheduler.on_raster_step(RasterPos::new(30, 40), &notifier);
        assert_eq!(notifier.take(), vec![1]);
    }

    #[test]
    fn test_unregister_stops_notifications() {
        let scheduler = ViewerScheduler::new();
        let notifier = RecordingNotifier::default();
        scheduler.register(5, RasterPos::new(100, 200));
        scheduler.unregister(5);
        // Unknown ids are a no-op.
        scheduler.unregister(99);

        scheduler.on_raster_step(RasterPos::new(100, 200), &notifier);
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn test_simultaneous_matches_all_notify() {
        let scheduler = ViewerScheduler::new();
        let notifier = RecordingNotifier::default();
        scheduler.register(1, RasterPos::new(0, 0));
        scheduler.register(2, RasterPos::new(0, 0));
        scheduler.register(3, RasterPos::new(1, 0));

        scheduler.on_raster_step(RasterPos::new(0, 0), &notifier);
        let mut ids = notifier.take();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_concurrent_registration_and_scanning() {
        let scheduler = Arc::new(ViewerScheduler::new());
        let notifier = RecordingNotifier::default();

        let register_side = {
            let scheduler = Arc::clone(&scheduler);
            std::thread::spawn(move || {
                for i in 0..1000u32 {
                    scheduler.register(i % 8, RasterPos::new((i % 262) as u16, 0));
                    scheduler.unregister((i + 4) % 8);
                }
            })
        };

        // Tight scan loop racing the registration thread; must neither
        // deadlock nor panic.
        for scanline in 0..262u16 {
            for cycle in 0..20u16 {
                scheduler.on_raster_step(RasterPos::new(scanline, cycle), &notifier);
            }
        }

        register_side.join().unwrap();
    }
}
