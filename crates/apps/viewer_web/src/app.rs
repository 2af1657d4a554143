//! Headless composition root: engine + feed registry + input adapters +
//! URL sync behind a pluggable `HistoryBackend`.
//!
//! All time is caller-supplied monotonic milliseconds, so the whole app
//! can be driven deterministically from tests or from
//! `performance.now()` in the browser.

use adapters::{CompassAdapter, GestureAdapter, KeyCommand, KeyboardAdapter};
use engine::{Engine, GeoBounds, PhotoKey, ViewerState};
use feed::{FeedError, SourceRegistry, decode_snapshot};
use geo::Coord;
use urlsync::{HistoryBackend, RetryOutcome, SyncScheduler, UrlState, query_for_viewer};

pub struct App<H: HistoryBackend> {
    engine: Engine,
    registry: SourceRegistry,
    keyboard: KeyboardAdapter,
    gesture: GestureAdapter,
    compass: CompassAdapter,
    history: H,
    scheduler: SyncScheduler,
    /// `photo=` from the startup URL, applied on the first snapshot that
    /// contains it.
    pending_focus: Option<PhotoKey>,
    /// Photo written back into the URL; set by an explicit focus, cleared
    /// when the viewer pans away.
    focused: Option<PhotoKey>,
}

impl<H: HistoryBackend> App<H> {
    pub fn new(history: H, now_ms: f64) -> Self {
        let mut engine = Engine::new(ViewerState::default());
        let pending_focus = match history.current_query() {
            Ok(query) => UrlState::parse(&query).apply_to(&mut engine),
            Err(err) => {
                log::debug!("no startup query available: {err}");
                None
            }
        };
        Self {
            engine,
            registry: SourceRegistry::new(),
            keyboard: KeyboardAdapter::new(),
            gesture: GestureAdapter::new(),
            compass: CompassAdapter::new(),
            history,
            scheduler: SyncScheduler::new(now_ms),
            pending_focus,
            focused: None,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn keyboard(&self) -> &KeyboardAdapter {
        &self.keyboard
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    // --- input entry points ---

    pub fn key(&mut self, cmd: KeyCommand, coarse: bool, now_ms: f64) {
        let before = self.engine.viewer().clone();
        self.keyboard.handle(&mut self.engine, cmd, coarse);
        self.note_if_changed(&before, now_ms);
    }

    pub fn gesture_begin(&mut self) {
        self.gesture.begin();
    }

    pub fn gesture_rotate(&mut self, delta_deg: f64, now_ms: f64) {
        let before = self.engine.viewer().clone();
        self.gesture.rotate(&mut self.engine, delta_deg);
        self.note_if_changed(&before, now_ms);
    }

    pub fn gesture_end(&mut self) {
        self.gesture.end();
    }

    pub fn compass_start(&mut self) {
        self.compass.start(&mut self.engine);
    }

    pub fn compass_stop(&mut self) {
        self.compass.stop(&mut self.engine);
    }

    pub fn compass_sample(&mut self, heading_deg: f64, now_ms: f64) {
        let before = self.engine.viewer().clone();
        self.compass.sample(&mut self.engine, heading_deg);
        self.note_if_changed(&before, now_ms);
    }

    pub fn pan(&mut self, center: Coord, now_ms: f64) {
        self.engine.set_center(center);
        self.focused = None;
        self.scheduler.note_change(now_ms);
    }

    pub fn set_zoom(&mut self, zoom: f64, now_ms: f64) {
        let before = self.engine.viewer().clone();
        self.engine.set_zoom(zoom);
        self.note_if_changed(&before, now_ms);
    }

    /// Visible extent reported by the map widget. Not part of the URL
    /// serialization, so no write is scheduled.
    pub fn set_bounds(&mut self, bounds: Option<GeoBounds>) {
        self.engine.set_bounds(bounds);
    }

    /// Recenters on a known photo and faces its shot bearing.
    pub fn focus(&mut self, key: &PhotoKey, now_ms: f64) -> bool {
        if self.engine.focus_photo(key) {
            self.focused = Some(key.clone());
            self.scheduler.note_change(now_ms);
            true
        } else {
            false
        }
    }

    // --- feed entry points ---

    /// Replaces one source's photo list from a feed snapshot. Returns the
    /// number of photos decoded for that source.
    pub fn snapshot(
        &mut self,
        source: &str,
        json: &str,
        now_ms: f64,
    ) -> Result<usize, FeedError> {
        let source = engine::SourceId::new(source);
        let photos = decode_snapshot(&source, json)?;
        let count = photos.len();
        self.registry.apply_snapshot(source, photos);
        self.engine.apply_snapshot(self.registry.merged());
        self.apply_pending_focus(now_ms);
        Ok(count)
    }

    pub fn set_source_enabled(&mut self, source: &str, enabled: bool) {
        let source = engine::SourceId::new(source);
        if self.registry.set_enabled(source, enabled) {
            self.engine.apply_snapshot(self.registry.merged());
        }
    }

    // --- URL sync ---

    /// Drives the sync scheduler: performs a due URL write from the
    /// current state and reports the outcome back.
    pub fn tick(&mut self, now_ms: f64) {
        let Some(token) = self.scheduler.poll(now_ms) else {
            return;
        };
        let query = query_for_viewer(self.engine.viewer(), self.focused.as_ref());
        match self.history.replace_query(&query) {
            Ok(()) => self.scheduler.report_success(token),
            Err(err) => match self.scheduler.report_failure(token, now_ms) {
                RetryOutcome::Armed => {}
                RetryOutcome::Superseded => {
                    log::debug!("url write failed but a newer state is pending: {err}");
                }
                RetryOutcome::Exhausted => {
                    log::warn!("url write failed twice, giving up: {err}");
                }
            },
        }
    }

    fn apply_pending_focus(&mut self, now_ms: f64) {
        let Some(key) = self.pending_focus.clone() else {
            return;
        };
        if self.engine.focus_photo(&key) {
            self.pending_focus = None;
            self.focused = Some(key);
            self.scheduler.note_change(now_ms);
        }
    }

    fn note_if_changed(&mut self, before: &ViewerState, now_ms: f64) {
        if self.engine.viewer() != before {
            self.scheduler.note_change(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use adapters::KeyCommand;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use urlsync::InMemoryHistory;

    use super::App;

    const SNAPSHOT: &str = r#"[
        {"id": "p1", "coord": {"lat": 50.0760, "lng": 14.4380},
         "bearing": 10.0, "url": "https://img.example/p1.jpg"},
        {"id": "p2", "coord": {"lat": 50.0800, "lng": 14.4500},
         "bearing": 123.4, "url": "https://img.example/p2.jpg"}
    ]"#;

    #[test]
    fn startup_url_seeds_viewer_and_defers_photo_focus() {
        let history = InMemoryHistory::new(
            "?lat=50.10000&lon=14.50000&zoom=15.00&bearing=90.0&photo=hillview-p2",
        );
        let mut app = App::new(history, 0.0);

        assert_relative_eq!(app.engine().viewer().center.lat, 50.1);
        assert_relative_eq!(app.engine().viewer().zoom, 15.0);
        assert_relative_eq!(app.engine().viewer().bearing_deg, 90.0);

        // The named photo arrives with the first snapshot; focus lands then.
        app.snapshot("hillview", SNAPSHOT, 1200.0).unwrap();
        assert_relative_eq!(app.engine().viewer().center.lat, 50.08);
        assert_relative_eq!(app.engine().viewer().center.lon, 14.45);
        assert_relative_eq!(app.engine().viewer().bearing_deg, 123.4);

        app.tick(1500.0);
        assert_eq!(
            app.history().writes(),
            ["?lat=50.08000&lon=14.45000&zoom=15.00&bearing=123.4&photo=hillview-p2"]
        );
    }

    #[test]
    fn rapid_rotations_coalesce_into_one_url_write() {
        let mut app = App::new(InMemoryHistory::new(""), 0.0);

        app.key(KeyCommand::RotateRight, false, 2000.0);
        app.key(KeyCommand::RotateRight, false, 2100.0);
        assert_relative_eq!(app.engine().viewer().bearing_deg, 10.0);

        app.tick(2350.0);
        assert!(app.history().writes().is_empty());

        app.tick(2400.0);
        assert_eq!(
            app.history().writes(),
            ["?lat=50.07550&lon=14.43780&zoom=14.00&bearing=10.0"]
        );
    }

    #[test]
    fn failed_write_retries_with_latest_state() {
        let mut history = InMemoryHistory::new("");
        history.fail_next_writes(1);
        let mut app = App::new(history, 0.0);

        app.key(KeyCommand::RotateRight, false, 2000.0);
        app.tick(2300.0); // fails, one retry armed

        // State moves on before the retry fires.
        app.key(KeyCommand::RotateRight, false, 2400.0);
        app.tick(2700.0);

        assert_eq!(
            app.history().writes(),
            ["?lat=50.07550&lon=14.43780&zoom=14.00&bearing=10.0"]
        );
    }

    #[test]
    fn snapshot_populates_the_selection() {
        let mut app = App::new(InMemoryHistory::new(""), 0.0);
        let count = app.snapshot("hillview", SNAPSHOT, 100.0).unwrap();
        assert_eq!(count, 2);

        let front = app.engine().selection().front.as_ref().expect("front");
        assert_eq!(front.photo.key.to_string(), "hillview-p1");
    }

    #[test]
    fn disabling_a_source_removes_its_photos() {
        let mut app = App::new(InMemoryHistory::new(""), 0.0);
        app.snapshot("hillview", SNAPSHOT, 100.0).unwrap();
        app.set_source_enabled("hillview", false);
        assert!(app.engine().selection().front.is_none());
        assert!(app.engine().annotated().is_empty());
    }

    #[test]
    fn bounds_reach_the_dto_without_scheduling_a_write() {
        use engine::GeoBounds;
        use geo::Coord;

        use crate::dto::SelectionDto;

        let mut app = App::new(InMemoryHistory::new(""), 0.0);
        app.set_bounds(Some(GeoBounds {
            nw: Coord::new(50.1, 14.3),
            se: Coord::new(50.0, 14.5),
        }));

        let dto = SelectionDto::from_engine(app.engine());
        let bounds = dto.viewer.bounds.expect("bounds");
        assert_eq!(bounds.nw_lat, 50.1);
        assert_eq!(bounds.se_lon, 14.5);

        // Bounds are not part of the URL; nothing becomes due.
        app.tick(10_000.0);
        assert!(app.history().writes().is_empty());
    }

    #[test]
    fn panning_away_drops_the_focused_photo_from_the_url() {
        let history = InMemoryHistory::new("?photo=hillview-p2");
        let mut app = App::new(history, 0.0);
        app.snapshot("hillview", SNAPSHOT, 1200.0).unwrap();

        app.pan(geo::Coord::new(50.2, 14.6), 2000.0);
        app.tick(2300.0);

        let last = app.history().writes().last().cloned().expect("write");
        assert!(!last.contains("photo="), "{last}");
        assert!(last.starts_with("?lat=50.20000&lon=14.60000"));
    }
}
